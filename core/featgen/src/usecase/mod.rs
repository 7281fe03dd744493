//! ユースケース層: ポート経由でのみ外界に触れる

pub mod assign_featured_image;
pub mod attachment_writer;
pub mod generate_and_stage;
pub mod pending_featured_image;
pub mod posts;
pub mod save_hook;
pub mod settings;

pub use assign_featured_image::AssignFeaturedImage;
pub use attachment_writer::AttachmentWriter;
pub use generate_and_stage::GenerateAndStage;
pub use pending_featured_image::PendingFeaturedImage;
pub use posts::PostUseCase;
pub use save_hook::{SaveHook, SaveHookOutcome};
pub use settings::SettingsUseCase;
