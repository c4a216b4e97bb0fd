pub mod address;
pub mod entity;
pub mod hit;
pub mod ids;
pub mod load_run;

pub use address::AddressRecord;
pub use entity::{Category, Entity};
pub use hit::SearchHit;
pub use ids::EntityId;
pub use load_run::LoadRun;
