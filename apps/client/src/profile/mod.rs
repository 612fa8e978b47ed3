pub mod fields;
pub mod model;
pub mod tag_editor;
pub mod tags;

pub use fields::{ListField, PendingResume, Profile, ScalarField};
pub use model::ProfileModel;
pub use tag_editor::{TagCommit, TagListEditor};
