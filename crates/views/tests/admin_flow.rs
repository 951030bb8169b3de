use models::{AlbumDraft, Label, ServiceDraft};
use service::api::images::UploadFile;
use service::reorder::{Direction, ReorderOutcome, ReorderStrategy};
use service::repository::mock::{self, Failure, MockCollection, MockGallery};
use service::upload::UploadPolicy;
use service::{MemorySessionStore, Session, SessionStore};
use views::screens::{AlbumDetailScreen, AlbumsScreen, ServicesScreen};
use views::{CountingScroll, MountOutcome};

#[tokio::test]
async fn signed_out_admin_is_sent_to_login_everywhere() -> anyhow::Result<()> {
    let store = MemorySessionStore::default();
    let albums = MockCollection::new(vec![mock::album(1, "Loft", Label::House)]);
    let services = MockCollection::new(vec![mock::service(1, "Tiles", 0)]);

    assert_eq!(AlbumsScreen::new(albums.clone()).mount(&store).await, MountOutcome::RedirectToLogin);
    assert_eq!(
        ServicesScreen::new(services.clone(), ReorderStrategy::Paired).mount(&store).await,
        MountOutcome::RedirectToLogin
    );
    assert_eq!(albums.calls() + services.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn create_album_then_fill_it() -> anyhow::Result<()> {
    let store = MemorySessionStore::default();
    store.save(&Session::new("tok", Some("admin".into()))).await?;

    let gallery = MockGallery::new(vec![], vec![]);
    let mut albums = AlbumsScreen::new(gallery.albums.clone());
    albums.mount(&store).await;
    let album = albums.create(&AlbumDraft::new("Seaside House", Label::House)).await?;

    let mut detail = AlbumDetailScreen::new(gallery.clone(), album.id, UploadPolicy::BestEffort, CountingScroll::default());
    assert_eq!(detail.mount(&store).await, MountOutcome::Ready);
    gallery.images.fail(Failure::Upload("b.jpg".into()));
    let files = vec![UploadFile::new("a.jpg", vec![1]), UploadFile::new("b.jpg", vec![2]), UploadFile::new("c.jpg", vec![3])];
    let report = detail.upload(&files).await?;

    assert_eq!(report.failures().len(), 1);
    assert_eq!(detail.images().iter().map(|i| i.name.as_str()).collect::<Vec<_>>(), vec!["a.jpg", "c.jpg"]);
    let cover = detail.images()[1].id;
    detail.set_cover(cover).await?;
    assert_eq!(gallery.albums.items()[0].cover_image_id(), Some(cover));
    Ok(())
}

#[tokio::test]
async fn batched_reorder_round_trip() -> anyhow::Result<()> {
    let store = MemorySessionStore::with_session(Session::new("tok", None));
    let repo = MockCollection::new(vec![mock::service(1, "Design", 0), mock::service(2, "Build", 1)]);
    let mut screen = ServicesScreen::new(repo.clone(), ReorderStrategy::Batched);
    screen.mount(&store).await;
    screen
        .create(&ServiceDraft { name: "Styling".into(), description: "Soft furnishing".into(), icon: None, order: 99 })
        .await?;
    screen.toggle_reorder();

    let outcome = screen.move_service(2, Direction::Up).await?;
    assert!(matches!(outcome, ReorderOutcome::Persisted));
    let shown: Vec<_> = screen.services().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(shown, vec!["Design", "Styling", "Build"]);

    let mut stored = repo.items();
    models::service::sort_by_order(&mut stored);
    assert_eq!(stored.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), shown);
    Ok(())
}
