pub mod asset;
pub mod character;
pub mod generation_job;
pub mod pose;
pub mod scene;
pub mod scene_frame;
