//! Multi-file upload into one album.
//!
//! Files go up strictly one after another, one request each. What happens
//! after a failure is an explicit [`UploadPolicy`]; the returned
//! [`UploadReport`] says what became of every file.

use models::{Id, Image};
use tracing::{info, instrument, warn};

use crate::api::images::UploadFile;
use crate::errors::ApiError;
use crate::repository::ImageRepository;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPolicy {
    /// Stop at the first failure; earlier files stay, later ones are skipped.
    #[default]
    AbortOnFirstFailure,
    /// Try every file and report each one.
    BestEffort,
    /// Stop at the first failure and delete what was already uploaded.
    AllOrNothing,
}

impl From<configs::UploadPolicyKind> for UploadPolicy {
    fn from(kind: configs::UploadPolicyKind) -> Self {
        match kind {
            configs::UploadPolicyKind::AbortOnFirstFailure => UploadPolicy::AbortOnFirstFailure,
            configs::UploadPolicyKind::BestEffort => UploadPolicy::BestEffort,
            configs::UploadPolicyKind::AllOrNothing => UploadPolicy::AllOrNothing,
        }
    }
}

/// Files finished so far; counts files, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (((self.completed + self.failed) * 100) / self.total) as u8
    }
}

#[derive(Debug, Clone)]
pub enum FileOutcome {
    Uploaded(Image),
    Failed(ApiError),
    /// Not attempted because an earlier file failed.
    Skipped,
    /// Uploaded, then deleted again by an all-or-nothing rollback.
    RolledBack(Image),
    /// Uploaded, and the rollback delete failed too.
    RollbackFailed { image: Image, error: ApiError },
}

#[derive(Debug, Clone)]
pub struct UploadReport {
    pub policy: UploadPolicy,
    pub files: Vec<(String, FileOutcome)>,
}

impl UploadReport {
    /// Images that are on the server after the batch.
    pub fn persisted(&self) -> Vec<&Image> {
        self.files
            .iter()
            .filter_map(|(_, o)| match o {
                FileOutcome::Uploaded(img) => Some(img),
                FileOutcome::RollbackFailed { image, .. } => Some(image),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(&str, &ApiError)> {
        self.files
            .iter()
            .filter_map(|(name, o)| match o {
                FileOutcome::Failed(e) => Some((name.as_str(), e)),
                _ => None,
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.files.iter().all(|(_, o)| matches!(o, FileOutcome::Uploaded(_)))
    }

    pub fn first_error(&self) -> Option<&ApiError> {
        self.failures().into_iter().next().map(|(_, e)| e)
    }
}

/// Upload `files` into `album_id` under `policy`.
///
/// `on_progress` runs after each file with the running counts and, when the
/// file went up, the new image, so a caller can show it right away.
///
/// # Examples
/// ```
/// use async_trait::async_trait;
/// use models::{Id, Image};
/// use service::api::images::UploadFile;
/// use service::repository::ImageRepository;
/// use service::upload::{upload_batch, UploadPolicy};
/// use service::{ApiError, Session};
///
/// struct RejectsPng;
///
/// #[async_trait]
/// impl ImageRepository for RejectsPng {
///     async fn upload(&self, _: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError> {
///         if file.file_name.ends_with(".png") {
///             return Err(ApiError::status(415, None));
///         }
///         Ok(Image {
///             id: 1,
///             name: file.file_name.clone(),
///             object_name: format!("albums/{album_id}/{}", file.file_name),
///             description: None,
///             album_id,
///             created_at: Default::default(),
///             updated_at: Default::default(),
///         })
///     }
///
///     async fn delete_image(&self, _: &Session, _: Id) -> Result<(), ApiError> { Ok(()) }
/// }
///
/// let files = vec![
///     UploadFile::new("a.jpg", vec![1]),
///     UploadFile::new("b.png", vec![2]),
///     UploadFile::new("c.jpg", vec![3]),
/// ];
/// let session = Session::new("token", None);
/// let report = tokio_test::block_on(upload_batch(
///     &RejectsPng, &session, 7, &files, UploadPolicy::AbortOnFirstFailure, |_, _| {},
/// ));
/// assert_eq!(report.persisted().len(), 1);
/// assert!(!report.is_success());
/// ```
#[instrument(skip(repo, session, files, on_progress), fields(total = files.len()))]
pub async fn upload_batch<R, F>(
    repo: &R,
    session: &Session,
    album_id: Id,
    files: &[UploadFile],
    policy: UploadPolicy,
    mut on_progress: F,
) -> UploadReport
where
    R: ImageRepository + ?Sized,
    F: FnMut(&UploadProgress, Option<&Image>),
{
    let mut progress = UploadProgress { completed: 0, failed: 0, total: files.len() };
    let mut outcomes: Vec<(String, FileOutcome)> = Vec::with_capacity(files.len());
    let mut stopped = false;

    for file in files {
        if stopped {
            outcomes.push((file.file_name.clone(), FileOutcome::Skipped));
            continue;
        }
        match repo.upload(session, album_id, file).await {
            Ok(image) => {
                progress.completed += 1;
                on_progress(&progress, Some(&image));
                outcomes.push((file.file_name.clone(), FileOutcome::Uploaded(image)));
            }
            Err(e) => {
                warn!(file = %file.file_name, error = %e, "upload failed");
                progress.failed += 1;
                on_progress(&progress, None);
                outcomes.push((file.file_name.clone(), FileOutcome::Failed(e)));
                stopped = policy != UploadPolicy::BestEffort;
            }
        }
    }

    if stopped && policy == UploadPolicy::AllOrNothing {
        rollback(repo, session, &mut outcomes).await;
    }

    let report = UploadReport { policy, files: outcomes };
    info!(
        album_id,
        persisted = report.persisted().len(),
        failed = report.failures().len(),
        "upload_batch_finished"
    );
    report
}

async fn rollback<R>(repo: &R, session: &Session, outcomes: &mut [(String, FileOutcome)])
where
    R: ImageRepository + ?Sized,
{
    for (name, outcome) in outcomes.iter_mut() {
        let FileOutcome::Uploaded(image) = outcome else { continue };
        let image = image.clone();
        *outcome = match repo.delete_image(session, image.id).await {
            Ok(()) => FileOutcome::RolledBack(image),
            Err(error) => {
                warn!(file = %name, image_id = image.id, error = %error, "rollback delete failed");
                FileOutcome::RollbackFailed { image, error }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::{Failure, MockCollection};

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names.iter().map(|n| UploadFile::new(*n, vec![0u8; 4])).collect()
    }

    fn session() -> Session { Session::new("t", None) }

    #[tokio::test]
    async fn abort_on_first_failure_keeps_earlier_and_skips_later() {
        let repo = MockCollection::<Image>::new(vec![]);
        repo.fail(Failure::Upload("2.jpg".into()));
        let mut seen = Vec::new();
        let report = upload_batch(&repo, &session(), 1, &files(&["1.jpg", "2.jpg", "3.jpg"]), UploadPolicy::AbortOnFirstFailure, |p, img| {
            seen.push((p.percent(), img.map(|i| i.name.clone())));
        })
        .await;

        assert_eq!(repo.items().len(), 1);
        assert_eq!(repo.items()[0].name, "1.jpg");
        assert!(matches!(report.files[1].1, FileOutcome::Failed(_)));
        assert!(matches!(report.files[2].1, FileOutcome::Skipped));
        // third file never reached the repository
        assert_eq!(repo.calls(), 2);
        assert_eq!(seen, vec![(33, Some("1.jpg".to_string())), (66, None)]);
        assert!(report.first_error().is_some());
    }

    #[tokio::test]
    async fn best_effort_attempts_everything() {
        let repo = MockCollection::<Image>::new(vec![]);
        repo.fail(Failure::Upload("2.jpg".into()));
        let report = upload_batch(&repo, &session(), 1, &files(&["1.jpg", "2.jpg", "3.jpg"]), UploadPolicy::BestEffort, |_, _| {}).await;
        assert_eq!(report.persisted().len(), 2);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(repo.calls(), 3);
    }

    #[tokio::test]
    async fn all_or_nothing_rolls_back() {
        let repo = MockCollection::<Image>::new(vec![]);
        repo.fail(Failure::Upload("3.jpg".into()));
        let report = upload_batch(&repo, &session(), 1, &files(&["1.jpg", "2.jpg", "3.jpg"]), UploadPolicy::AllOrNothing, |_, _| {}).await;
        assert!(repo.items().is_empty());
        assert!(report.persisted().is_empty());
        assert!(matches!(report.files[0].1, FileOutcome::RolledBack(_)));
        assert!(matches!(report.files[1].1, FileOutcome::RolledBack(_)));
    }

    #[tokio::test]
    async fn all_or_nothing_reports_failed_rollback() {
        let repo = MockCollection::<Image>::new(vec![]);
        repo.fail(Failure::Upload("2.jpg".into()));
        // first upload gets id 1; make its delete fail
        repo.fail(Failure::Delete(1));
        let report = upload_batch(&repo, &session(), 1, &files(&["1.jpg", "2.jpg"]), UploadPolicy::AllOrNothing, |_, _| {}).await;
        assert!(matches!(report.files[0].1, FileOutcome::RollbackFailed { .. }));
        assert_eq!(report.persisted().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_trivially_complete() {
        let repo = MockCollection::<Image>::new(vec![]);
        let report = upload_batch(&repo, &session(), 1, &[], UploadPolicy::default(), |_, _| {}).await;
        assert!(report.is_success());
        assert_eq!(UploadProgress { completed: 0, failed: 0, total: 0 }.percent(), 100);
    }
}
