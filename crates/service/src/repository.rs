use async_trait::async_trait;
use models::{
    Album, AlbumDraft, AlbumPatch, AlbumWithImages, ContactDraft, ContactMessage, Folder, FolderDraft, Id, Identified,
    Image, Label, OrderAssignment, Service, ServiceDraft, Statistics, Validate,
};

use crate::api::images::UploadFile;
use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::session::Session;

/// A collection an admin screen lists and deletes from.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    type Item: Identified + Clone + Send + Sync + 'static;

    /// Failed fetches come back empty.
    async fn fetch_all(&self, session: &Session) -> Vec<Self::Item>;
    async fn remove(&self, session: &Session, id: Id) -> Result<(), ApiError>;
}

/// A collection with a create/edit form.
#[async_trait]
pub trait EditableRepository: AdminRepository {
    type Draft: Validate + Clone + Send + Sync + 'static;

    async fn create(&self, session: &Session, draft: &Self::Draft) -> Result<Self::Item, ApiError>;
    async fn update(&self, session: &Session, id: Id, draft: &Self::Draft) -> Result<Self::Item, ApiError>;
}

#[async_trait]
pub trait ServiceOrdering: Send + Sync {
    async fn set_order(&self, session: &Session, id: Id, order: i32) -> Result<Service, ApiError>;
    async fn set_orders(&self, session: &Session, orders: &[OrderAssignment]) -> Result<Vec<Service>, ApiError>;
}

#[async_trait]
pub trait ReadMarker: Send + Sync {
    async fn set_read(&self, session: &Session, id: Id, read: bool) -> Result<ContactMessage, ApiError>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn upload(&self, session: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError>;
    async fn delete_image(&self, session: &Session, image_id: Id) -> Result<(), ApiError>;
}

/// Album plus its ordered images, as the public gallery reads them.
#[async_trait]
pub trait AlbumSource: Send + Sync {
    async fn album_with_images(&self, album_id: Id) -> Result<Option<AlbumWithImages>, ApiError>;
}

#[async_trait]
pub trait AlbumEditor: Send + Sync {
    async fn update_album(&self, session: &Session, album_id: Id, patch: &AlbumPatch) -> Result<Album, ApiError>;
}

#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn statistics(&self, session: &Session) -> Result<Statistics, ApiError>;
}

/// What the public pages read, plus the contact form.
#[async_trait]
pub trait PublicCatalog: Send + Sync {
    async fn gallery(&self, label: Option<Label>) -> Vec<AlbumWithImages>;
    async fn services(&self) -> Vec<Service>;
    async fn submit_contact(&self, draft: &ContactDraft) -> Result<ContactMessage, ApiError>;
}

/// HTTP-backed collection handles; each wraps a cheap clone of the client.
#[derive(Clone, Debug)]
pub struct HttpAlbums(pub ApiClient);
#[derive(Clone, Debug)]
pub struct HttpFolders(pub ApiClient);
#[derive(Clone, Debug)]
pub struct HttpServices(pub ApiClient);
#[derive(Clone, Debug)]
pub struct HttpContacts(pub ApiClient);

#[async_trait]
impl AdminRepository for HttpAlbums {
    type Item = Album;

    async fn fetch_all(&self, session: &Session) -> Vec<Album> { self.0.admin_list_albums(session).await }

    async fn remove(&self, session: &Session, id: Id) -> Result<(), ApiError> { self.0.delete_album(session, id).await }
}

#[async_trait]
impl EditableRepository for HttpAlbums {
    type Draft = AlbumDraft;

    async fn create(&self, session: &Session, draft: &AlbumDraft) -> Result<Album, ApiError> {
        self.0.create_album(session, draft).await
    }

    async fn update(&self, session: &Session, id: Id, draft: &AlbumDraft) -> Result<Album, ApiError> {
        draft.validate()?;
        self.0.update_album(session, id, &AlbumPatch::from(draft)).await
    }
}

#[async_trait]
impl AdminRepository for HttpFolders {
    type Item = Folder;

    async fn fetch_all(&self, session: &Session) -> Vec<Folder> { self.0.list_folders(session).await }

    async fn remove(&self, session: &Session, id: Id) -> Result<(), ApiError> { self.0.delete_folder(session, id).await }
}

#[async_trait]
impl EditableRepository for HttpFolders {
    type Draft = FolderDraft;

    async fn create(&self, session: &Session, draft: &FolderDraft) -> Result<Folder, ApiError> {
        self.0.create_folder(session, draft).await
    }

    async fn update(&self, session: &Session, id: Id, draft: &FolderDraft) -> Result<Folder, ApiError> {
        self.0.rename_folder(session, id, draft).await
    }
}

#[async_trait]
impl AdminRepository for HttpServices {
    type Item = Service;

    async fn fetch_all(&self, _session: &Session) -> Vec<Service> { self.0.list_services().await }

    async fn remove(&self, session: &Session, id: Id) -> Result<(), ApiError> { self.0.delete_service(session, id).await }
}

#[async_trait]
impl EditableRepository for HttpServices {
    type Draft = ServiceDraft;

    async fn create(&self, session: &Session, draft: &ServiceDraft) -> Result<Service, ApiError> {
        self.0.create_service(session, draft).await
    }

    async fn update(&self, session: &Session, id: Id, draft: &ServiceDraft) -> Result<Service, ApiError> {
        self.0.update_service(session, id, draft).await
    }
}

#[async_trait]
impl ServiceOrdering for HttpServices {
    async fn set_order(&self, session: &Session, id: Id, order: i32) -> Result<Service, ApiError> {
        self.0.set_service_order(session, id, order).await
    }

    async fn set_orders(&self, session: &Session, orders: &[OrderAssignment]) -> Result<Vec<Service>, ApiError> {
        self.0.set_service_orders(session, orders).await
    }
}

#[async_trait]
impl AdminRepository for HttpContacts {
    type Item = ContactMessage;

    async fn fetch_all(&self, session: &Session) -> Vec<ContactMessage> { self.0.list_contacts(session).await }

    async fn remove(&self, session: &Session, id: Id) -> Result<(), ApiError> { self.0.delete_contact(session, id).await }
}

#[async_trait]
impl ReadMarker for HttpContacts {
    async fn set_read(&self, session: &Session, id: Id, read: bool) -> Result<ContactMessage, ApiError> {
        self.0.set_contact_read(session, id, read).await
    }
}

#[async_trait]
impl ImageRepository for ApiClient {
    async fn upload(&self, session: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError> {
        self.upload_image(session, album_id, file).await
    }

    async fn delete_image(&self, session: &Session, image_id: Id) -> Result<(), ApiError> {
        ApiClient::delete_image(self, session, image_id).await
    }
}

#[async_trait]
impl AlbumSource for ApiClient {
    async fn album_with_images(&self, album_id: Id) -> Result<Option<AlbumWithImages>, ApiError> {
        ApiClient::album_with_images(self, album_id).await
    }
}

#[async_trait]
impl AlbumEditor for ApiClient {
    async fn update_album(&self, session: &Session, album_id: Id, patch: &AlbumPatch) -> Result<Album, ApiError> {
        ApiClient::update_album(self, session, album_id, patch).await
    }
}

#[async_trait]
impl StatisticsSource for ApiClient {
    async fn statistics(&self, session: &Session) -> Result<Statistics, ApiError> {
        ApiClient::statistics(self, session).await
    }
}

#[async_trait]
impl PublicCatalog for ApiClient {
    async fn gallery(&self, label: Option<Label>) -> Vec<AlbumWithImages> { self.albums_with_images(label).await }

    async fn services(&self) -> Vec<Service> { self.list_services().await }

    async fn submit_contact(&self, draft: &ContactDraft) -> Result<ContactMessage, ApiError> {
        ApiClient::submit_contact(self, draft).await
    }
}

/// In-memory repositories for tests, behind the `test-support` feature.
///
/// Every collection counts the calls it receives and can be told to fail
/// specific operations, which is how partial-failure paths are exercised.
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex, MutexGuard};
    use std::time::Duration;

    /// Operation to fail on purpose.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Failure {
        List,
        Create,
        Update(Id),
        Delete(Id),
        Order(Id),
        BatchOrder,
        Read(Id),
        Upload(String),
        Fetch,
        Statistics,
    }

    fn injected() -> ApiError {
        ApiError::status(500, None)
    }

    fn now() -> models::timestamp::Timestamp {
        chrono::Utc::now().naive_utc()
    }

    struct State<T> {
        items: Vec<T>,
        next_id: Id,
        failures: HashSet<Failure>,
        calls: usize,
        delay: Option<Duration>,
    }

    /// Shared-state collection; clones observe the same items and counters.
    pub struct MockCollection<T> {
        state: Arc<Mutex<State<T>>>,
    }

    impl<T> Clone for MockCollection<T> {
        fn clone(&self) -> Self { Self { state: Arc::clone(&self.state) } }
    }

    impl<T: Identified + Clone> MockCollection<T> {
        pub fn new(items: Vec<T>) -> Self {
            let next_id = items.iter().map(|i| i.id()).max().unwrap_or(0) + 1;
            Self {
                state: Arc::new(Mutex::new(State { items, next_id, failures: HashSet::new(), calls: 0, delay: None })),
            }
        }

        fn lock(&self) -> MutexGuard<'_, State<T>> {
            self.state.lock().unwrap_or_else(|p| p.into_inner())
        }

        pub fn fail(&self, failure: Failure) -> &Self {
            self.lock().failures.insert(failure);
            self
        }

        pub fn heal(&self, failure: &Failure) -> &Self {
            self.lock().failures.remove(failure);
            self
        }

        /// Delay every call, to interleave concurrent requests in tests.
        pub fn with_delay(self, delay: Duration) -> Self {
            self.lock().delay = Some(delay);
            self
        }

        /// Number of calls received, failed ones included.
        pub fn calls(&self) -> usize { self.lock().calls }

        pub fn items(&self) -> Vec<T> { self.lock().items.clone() }

        async fn enter(&self, failure: Option<Failure>) -> Result<(), ApiError> {
            let delay = {
                let mut s = self.lock();
                s.calls += 1;
                if let Some(f) = &failure {
                    if s.failures.contains(f) {
                        return Err(injected());
                    }
                }
                s.delay
            };
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            Ok(())
        }

        fn allocate_id(&self) -> Id {
            let mut s = self.lock();
            let id = s.next_id;
            s.next_id += 1;
            id
        }

        fn push(&self, item: T) -> T {
            self.lock().items.push(item.clone());
            item
        }

        fn replace(&self, id: Id, f: impl FnOnce(&mut T)) -> Result<T, ApiError> {
            let mut s = self.lock();
            let item = s
                .items
                .iter_mut()
                .find(|i| i.id() == id)
                .ok_or_else(|| ApiError::status(404, Some("not found".into())))?;
            f(item);
            Ok(item.clone())
        }
    }

    #[async_trait]
    impl<T> AdminRepository for MockCollection<T>
    where
        T: Identified + Clone + Send + Sync + 'static,
    {
        type Item = T;

        async fn fetch_all(&self, _session: &Session) -> Vec<T> {
            match self.enter(Some(Failure::List)).await {
                Ok(()) => self.items(),
                Err(_) => Vec::new(),
            }
        }

        async fn remove(&self, _session: &Session, id: Id) -> Result<(), ApiError> {
            self.enter(Some(Failure::Delete(id))).await?;
            let mut s = self.lock();
            let before = s.items.len();
            s.items.retain(|i| i.id() != id);
            if s.items.len() == before {
                return Err(ApiError::status(404, Some("not found".into())));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EditableRepository for MockCollection<Album> {
        type Draft = AlbumDraft;

        async fn create(&self, _session: &Session, draft: &AlbumDraft) -> Result<Album, ApiError> {
            draft.validate()?;
            self.enter(Some(Failure::Create)).await?;
            let album = Album {
                id: self.allocate_id(),
                name: draft.name.trim().to_string(),
                label: draft.label.unwrap_or(Label::House),
                description: draft.description.clone(),
                cover_image: None,
                created_at: now(),
                updated_at: now(),
            };
            Ok(self.push(album))
        }

        async fn update(&self, session: &Session, id: Id, draft: &AlbumDraft) -> Result<Album, ApiError> {
            draft.validate()?;
            self.update_album(session, id, &AlbumPatch::from(draft)).await
        }
    }

    #[async_trait]
    impl AlbumEditor for MockCollection<Album> {
        async fn update_album(&self, _session: &Session, album_id: Id, patch: &AlbumPatch) -> Result<Album, ApiError> {
            patch.validate()?;
            self.enter(Some(Failure::Update(album_id))).await?;
            let patch = patch.clone();
            self.replace(album_id, move |a| {
                if let Some(name) = patch.name { a.name = name; }
                if let Some(label) = patch.label { a.label = label; }
                if patch.description.is_some() { a.description = patch.description; }
                if patch.cover_image.is_some() { a.cover_image = patch.cover_image; }
                a.updated_at = now();
            })
        }
    }

    #[async_trait]
    impl EditableRepository for MockCollection<Folder> {
        type Draft = FolderDraft;

        async fn create(&self, _session: &Session, draft: &FolderDraft) -> Result<Folder, ApiError> {
            draft.validate()?;
            self.enter(Some(Failure::Create)).await?;
            let folder = Folder { id: self.allocate_id(), name: draft.name.trim().to_string(), created_at: now(), updated_at: now() };
            Ok(self.push(folder))
        }

        async fn update(&self, _session: &Session, id: Id, draft: &FolderDraft) -> Result<Folder, ApiError> {
            draft.validate()?;
            self.enter(Some(Failure::Update(id))).await?;
            let name = draft.name.trim().to_string();
            self.replace(id, move |f| { f.name = name; f.updated_at = now(); })
        }
    }

    #[async_trait]
    impl EditableRepository for MockCollection<Service> {
        type Draft = ServiceDraft;

        async fn create(&self, _session: &Session, draft: &ServiceDraft) -> Result<Service, ApiError> {
            draft.validate()?;
            self.enter(Some(Failure::Create)).await?;
            let service = Service {
                id: self.allocate_id(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                icon: draft.icon.clone(),
                order: draft.order,
                created_at: Some(now()),
                updated_at: Some(now()),
            };
            Ok(self.push(service))
        }

        async fn update(&self, _session: &Session, id: Id, draft: &ServiceDraft) -> Result<Service, ApiError> {
            draft.validate()?;
            self.enter(Some(Failure::Update(id))).await?;
            let draft = draft.clone();
            self.replace(id, move |s| {
                s.name = draft.name;
                s.description = draft.description;
                s.icon = draft.icon;
                s.order = draft.order;
                s.updated_at = Some(now());
            })
        }
    }

    #[async_trait]
    impl ServiceOrdering for MockCollection<Service> {
        async fn set_order(&self, _session: &Session, id: Id, order: i32) -> Result<Service, ApiError> {
            self.enter(Some(Failure::Order(id))).await?;
            self.replace(id, move |s| s.order = order)
        }

        async fn set_orders(&self, _session: &Session, orders: &[OrderAssignment]) -> Result<Vec<Service>, ApiError> {
            self.enter(Some(Failure::BatchOrder)).await?;
            let mut s = self.lock();
            if orders.iter().any(|o| !s.items.iter().any(|i| i.id == o.id)) {
                return Err(ApiError::status(404, Some("not found".into())));
            }
            for o in orders {
                if let Some(item) = s.items.iter_mut().find(|i| i.id == o.id) {
                    item.order = o.order;
                }
            }
            let mut all = s.items.clone();
            models::service::sort_by_order(&mut all);
            Ok(all)
        }
    }

    #[async_trait]
    impl ReadMarker for MockCollection<ContactMessage> {
        async fn set_read(&self, _session: &Session, id: Id, read: bool) -> Result<ContactMessage, ApiError> {
            self.enter(Some(Failure::Read(id))).await?;
            self.replace(id, move |c| c.is_read = read)
        }
    }

    #[async_trait]
    impl ImageRepository for MockCollection<Image> {
        async fn upload(&self, _session: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError> {
            self.enter(Some(Failure::Upload(file.file_name.clone()))).await?;
            let id = self.allocate_id();
            let image = Image {
                id,
                name: file.file_name.clone(),
                object_name: format!("albums/{album_id}/{id}-{}", file.file_name),
                description: None,
                album_id,
                created_at: now(),
                updated_at: now(),
            };
            Ok(self.push(image))
        }

        async fn delete_image(&self, session: &Session, image_id: Id) -> Result<(), ApiError> {
            self.remove(session, image_id).await
        }
    }

    /// Albums and images side by side, for gallery and album-detail screens.
    #[derive(Clone)]
    pub struct MockGallery {
        pub albums: MockCollection<Album>,
        pub images: MockCollection<Image>,
    }

    impl MockGallery {
        pub fn new(albums: Vec<Album>, images: Vec<Image>) -> Self {
            Self { albums: MockCollection::new(albums), images: MockCollection::new(images) }
        }
    }

    #[async_trait]
    impl AlbumSource for MockGallery {
        async fn album_with_images(&self, album_id: Id) -> Result<Option<AlbumWithImages>, ApiError> {
            self.albums.enter(Some(Failure::Fetch)).await?;
            let Some(album) = self.albums.items().into_iter().find(|a| a.id == album_id) else {
                return Ok(None);
            };
            let images = self.images.items().into_iter().filter(|i| i.album_id == album_id).collect();
            Ok(Some(AlbumWithImages { album, images }))
        }
    }

    #[async_trait]
    impl AlbumEditor for MockGallery {
        async fn update_album(&self, session: &Session, album_id: Id, patch: &AlbumPatch) -> Result<Album, ApiError> {
            self.albums.update_album(session, album_id, patch).await
        }
    }

    #[async_trait]
    impl ImageRepository for MockGallery {
        async fn upload(&self, session: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError> {
            self.images.upload(session, album_id, file).await
        }

        async fn delete_image(&self, session: &Session, image_id: Id) -> Result<(), ApiError> {
            self.images.delete_image(session, image_id).await
        }
    }

    /// Public side: a fixed gallery, a service list and an inbox.
    #[derive(Clone)]
    pub struct MockCatalog {
        pub albums: Vec<AlbumWithImages>,
        pub services: MockCollection<Service>,
        pub inbox: MockCollection<ContactMessage>,
    }

    impl MockCatalog {
        pub fn new(albums: Vec<AlbumWithImages>, services: Vec<Service>) -> Self {
            Self { albums, services: MockCollection::new(services), inbox: MockCollection::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PublicCatalog for MockCatalog {
        async fn gallery(&self, label: Option<Label>) -> Vec<AlbumWithImages> {
            self.albums
                .iter()
                .filter(|a| label.map_or(true, |l| a.album.label == l))
                .cloned()
                .collect()
        }

        async fn services(&self) -> Vec<Service> {
            let mut all = self.services.fetch_all(&Session::new("public", None)).await;
            models::service::sort_by_order(&mut all);
            all
        }

        async fn submit_contact(&self, draft: &ContactDraft) -> Result<ContactMessage, ApiError> {
            draft.validate()?;
            self.inbox.enter(Some(Failure::Create)).await?;
            let msg = ContactMessage {
                id: self.inbox.allocate_id(),
                name: draft.name.trim().to_string(),
                phone: draft.phone.trim().to_string(),
                email: draft.email.trim().to_string(),
                message: draft.message.clone(),
                is_read: false,
                created_at: now(),
            };
            Ok(self.inbox.push(msg))
        }
    }

    /// Fixed dashboard counters.
    #[derive(Clone, Default)]
    pub struct MockStatistics {
        pub value: Statistics,
        pub failing: bool,
    }

    #[async_trait]
    impl StatisticsSource for MockStatistics {
        async fn statistics(&self, _session: &Session) -> Result<Statistics, ApiError> {
            if self.failing {
                return Err(injected());
            }
            Ok(self.value)
        }
    }

    /// Fixture builders.
    pub fn album(id: Id, name: &str, label: Label) -> Album {
        Album { id, name: name.into(), label, description: None, cover_image: None, created_at: now(), updated_at: now() }
    }

    pub fn image(id: Id, album_id: Id) -> Image {
        Image {
            id,
            name: format!("img-{id}.jpg"),
            object_name: format!("albums/{album_id}/img-{id}.jpg"),
            description: None,
            album_id,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn folder(id: Id, name: &str) -> Folder {
        Folder { id, name: name.into(), created_at: now(), updated_at: now() }
    }

    pub fn service(id: Id, name: &str, order: i32) -> Service {
        Service { id, name: name.into(), description: format!("{name} description"), icon: None, order, created_at: None, updated_at: None }
    }

    pub fn contact(id: Id, is_read: bool) -> ContactMessage {
        ContactMessage {
            id,
            name: format!("visitor {id}"),
            phone: "0912-345-678".into(),
            email: format!("visitor{id}@example.com"),
            message: "Looking for a renovation quote".into(),
            is_read,
            created_at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    fn session() -> Session { Session::new("t", None) }

    #[tokio::test]
    async fn mock_remove_respects_injected_failure() {
        let repo = MockCollection::new(vec![folder(1, "a"), folder(2, "b")]);
        repo.fail(Failure::Delete(1));
        assert!(repo.remove(&session(), 1).await.is_err());
        assert!(repo.remove(&session(), 2).await.is_ok());
        assert_eq!(repo.items().len(), 1);
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn mock_list_failure_degrades_to_empty() {
        let repo = MockCollection::new(vec![folder(1, "a")]);
        repo.fail(Failure::List);
        assert!(repo.fetch_all(&session()).await.is_empty());
        repo.heal(&Failure::List);
        assert_eq!(repo.fetch_all(&session()).await.len(), 1);
    }

    #[tokio::test]
    async fn mock_create_allocates_fresh_ids() {
        let repo = MockCollection::new(vec![folder(4, "a")]);
        let f = repo.create(&session(), &FolderDraft::new(" Residential ")).await.unwrap();
        assert_eq!(f.id, 5);
        assert_eq!(f.name, "Residential");
    }

    #[tokio::test]
    async fn gallery_filters_images_by_album() {
        let g = MockGallery::new(
            vec![album(1, "a", models::Label::House)],
            vec![image(10, 1), image(11, 2), image(12, 1)],
        );
        let a = g.album_with_images(1).await.unwrap().unwrap();
        assert_eq!(a.images.iter().map(|i| i.id).collect::<Vec<_>>(), vec![10, 12]);
        assert!(g.album_with_images(9).await.unwrap().is_none());
    }
}
