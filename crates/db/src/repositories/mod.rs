pub mod asset_repo;
pub mod character_repo;
pub mod generation_job_repo;
pub mod pose_repo;
pub mod scene_frame_repo;
pub mod scene_repo;

pub use asset_repo::AssetRepo;
pub use character_repo::CharacterRepo;
pub use generation_job_repo::GenerationJobRepo;
pub use pose_repo::PoseRepo;
pub use scene_frame_repo::SceneFrameRepo;
pub use scene_repo::SceneRepo;
