pub mod add_object;
pub mod as_any;
pub mod remove_object;
pub mod reorder;
pub mod set_auto_calculate;
pub mod set_detector_zone;
pub mod set_geometry;
pub mod set_name;
pub mod set_transform;
pub mod set_zone_operations;

pub use add_object::AddObjectCommand;
pub use as_any::AsAny;
pub use remove_object::RemoveObjectCommand;
pub use reorder::{ChangeObjectOrderCommand, MoveObjectInTreeCommand};
pub use set_auto_calculate::SetAutoCalculateCommand;
pub use set_detector_zone::SetDetectorZoneCommand;
pub use set_geometry::{SetGeometryCommand, SetWorldZoneGeometryCommand};
pub use set_name::SetNameCommand;
pub use set_transform::{SetPositionCommand, SetRotationCommand};
pub use set_zone_operations::SetZoneOperationsCommand;

use crate::error::EditorError;
use crate::scene::graph::SceneGraph;
use crate::signals::{SignalKind, SignalPayload};
use std::fmt::Debug;
use uuid::Uuid;

/// A reversible scene mutation.
///
/// `validate` runs against the unmodified scene and must catch every
/// failure; once it passes, `execute` and `revert` are infallible and
/// exact inverses. A command captures whatever prior state it needs
/// during its first `execute`, so redo replays from the same capture.
pub trait Command: AsAny + Debug {
    fn kind_name(&self) -> &'static str;

    fn validate(&self, scene: &SceneGraph) -> Result<(), EditorError>;

    fn execute(&mut self, scene: &mut SceneGraph);

    fn revert(&mut self, scene: &mut SceneGraph);

    /// Every UUID this command affected, for dependency-based cache
    /// invalidation. Valid after `execute` or `revert`.
    fn touched(&self) -> Vec<Uuid>;

    /// Updatable commands coalesce with an immediately preceding command
    /// of the same kind, target and attribute.
    fn is_updatable(&self) -> bool {
        false
    }

    fn target(&self) -> Option<Uuid> {
        None
    }

    fn attribute_name(&self) -> Option<&'static str> {
        None
    }

    /// Fold a newer updatable command into this one, keeping this
    /// command's captured prior state.
    fn absorb(&mut self, _newer: Box<dyn Command>) {}

    fn signals_after_execute(&self) -> Vec<(SignalKind, SignalPayload)>;

    fn signals_after_revert(&self) -> Vec<(SignalKind, SignalPayload)> {
        self.signals_after_execute()
    }
}
