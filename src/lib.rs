/*
 * simscene is the in-memory editing kernel of a simulation-geometry editor:
 * a scene graph of primitives, boolean zones, detectors and beam settings,
 * mutated exclusively through reversible commands, with a synchronous signal
 * bus keeping dependent views consistent with the model.
 *
 * Rendering, file dialogs and simulator job submission live outside this
 * crate and talk to it through the `Editor` API.
 */

pub mod commands;
pub mod csg;
pub mod editor;
pub mod error;
pub mod history;
pub mod scene;
pub mod serialization;
pub mod signals;
pub mod zone;
