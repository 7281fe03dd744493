//! featgen 固有のドメイン型（型と不変条件）

pub mod command;
pub mod credential;
pub mod envelope;
pub mod generated_image;
pub mod ids;
pub mod media_asset;
pub mod nonce;
pub mod post;
pub mod prompt;
pub mod settings;

pub use command::{FeatgenCommand, PostCommand, SettingsCommand};
pub use credential::Credential;
pub use envelope::Envelope;
pub use generated_image::{GeneratedImage, ImageKind};
pub use ids::{AssetId, PostId};
pub use media_asset::{AttachmentMetadata, MediaAsset, NewMediaAsset};
pub use nonce::{Nonce, NonceAction};
pub use post::{NewPost, Post, PostUpdate, SaveEvent};
pub use prompt::{GenerationRequest, Prompt};
pub use settings::Settings;
