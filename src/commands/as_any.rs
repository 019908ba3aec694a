use std::any::Any;

// Upcast hooks for boxed commands, so `absorb` can downcast a
// `Box<dyn Command>` back to its concrete type.
pub trait AsAny {
    fn as_any_ref(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_any_box(self: Box<Self>) -> Box<dyn Any>;
}

// Blanket impl: every `Any` type gets the casts for free. These bodies
// need the concrete `Sized` type, so they cannot be default methods on
// the trait itself.
impl<T> AsAny for T
where
    T: Any,
{
    fn as_any_ref(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_any_box(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
