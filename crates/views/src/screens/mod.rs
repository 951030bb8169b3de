//! Admin and public screens as plain state objects.

pub mod album_detail;
pub mod albums;
pub mod dashboard;
pub mod folders;
pub mod login;
pub mod messages;
pub mod public;
pub mod services;

pub use album_detail::AlbumDetailScreen;
pub use albums::AlbumsScreen;
pub use dashboard::DashboardScreen;
pub use folders::FoldersScreen;
pub use login::LoginScreen;
pub use messages::{MessageFilter, MessagesScreen};
pub use public::{ContactForm, ServicesPage};
pub use services::ServicesScreen;
