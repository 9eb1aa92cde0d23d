use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use fitcoach_domain::intake::{ClientSubmission, SubmissionStatus, Transformation};

use crate::domain::repository::{SubmissionRepository, TransformationRepository};
use crate::error::SiteError;

/// A JSON array file read and rewritten wholesale on every operation.
///
/// All access goes through one async mutex per file so a read never observes
/// a half-applied mutation from this process. Writes go to a sibling temp
/// file and are renamed into place.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: Arc::clone(&self.lock),
            _items: PhantomData,
        }
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _items: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_unlocked(&self) -> anyhow::Result<Option<Vec<T>>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map(Some)
                .with_context(|| format!("parse {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    async fn write_unlocked(&self, items: &[T]) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create data dir {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(items).context("serialize items")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    /// All items; a missing file reads as empty.
    pub async fn load(&self) -> anyhow::Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_unlocked().await?.unwrap_or_default())
    }

    /// All items; a missing file is created with `seed()` first.
    pub async fn load_or_seed(&self, seed: impl FnOnce() -> Vec<T>) -> anyhow::Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        if let Some(items) = self.read_unlocked().await? {
            return Ok(items);
        }
        let items = seed();
        self.write_unlocked(&items).await?;
        Ok(items)
    }

    pub async fn append(&self, item: T) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_unlocked().await?.unwrap_or_default();
        items.push(item);
        self.write_unlocked(&items).await
    }

    /// Append `item`; a missing file is created with `seed()` first.
    pub async fn append_or_seed(
        &self,
        item: T,
        seed: impl FnOnce() -> Vec<T>,
    ) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_unlocked().await?.unwrap_or_else(seed);
        items.push(item);
        self.write_unlocked(&items).await
    }

    /// Apply `f` to the first item matching `pred` and persist. `None` if nothing matched.
    pub async fn update<P, F>(&self, pred: P, f: F) -> anyhow::Result<Option<T>>
    where
        T: Clone,
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read_unlocked().await?.unwrap_or_default();
        let Some(item) = items.iter_mut().find(|item| pred(item)) else {
            return Ok(None);
        };
        f(item);
        let updated = item.clone();
        self.write_unlocked(&items).await?;
        Ok(Some(updated))
    }
}

// ── Submissions ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FileSubmissionRepository {
    pub file: JsonFileStore<ClientSubmission>,
}

impl SubmissionRepository for FileSubmissionRepository {
    async fn list(&self) -> Result<Vec<ClientSubmission>, SiteError> {
        Ok(self.file.load().await?)
    }

    async fn append(&self, submission: &ClientSubmission) -> Result<(), SiteError> {
        Ok(self.file.append(submission.clone()).await?)
    }

    async fn update_status(
        &self,
        id: &str,
        status: SubmissionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ClientSubmission>, SiteError> {
        Ok(self
            .file
            .update(
                |s| s.id == id,
                |s| {
                    s.status = status;
                    s.updated_at = Some(updated_at);
                },
            )
            .await?)
    }
}

// ── Transformations ──────────────────────────────────────────────────────────

/// Stories shown before any admin has published one.
pub fn default_transformations() -> Vec<Transformation> {
    vec![
        Transformation {
            id: "1".to_owned(),
            name: "Sarah Johnson".to_owned(),
            before_photo: "/before-photo-overweight-person-fitness-transformat.jpg".to_owned(),
            after_photo: "/after-photo-fit-athletic-person-fitness-transforma.jpg".to_owned(),
            testimonial: "Lost 45 pounds in 6 months! The personalized training program was \
                          exactly what I needed. My confidence has skyrocketed!"
                .to_owned(),
            rating: 5,
            transformation: "Weight Loss".to_owned(),
            timeframe: "6 months".to_owned(),
            created_at: None,
        },
        Transformation {
            id: "2".to_owned(),
            name: "Mike Chen".to_owned(),
            before_photo: "/before-photo-skinny-person-muscle-building-transfo.jpg".to_owned(),
            after_photo: "/after-photo-muscular-athletic-person-bodybuilding-.jpg".to_owned(),
            testimonial: "Gained 25 pounds of lean muscle! The nutrition and workout plan was \
                          perfect for my goals. Highly recommend!"
                .to_owned(),
            rating: 5,
            transformation: "Muscle Building".to_owned(),
            timeframe: "8 months".to_owned(),
            created_at: None,
        },
    ]
}

#[derive(Clone)]
pub struct FileTransformationRepository {
    pub file: JsonFileStore<Transformation>,
}

impl TransformationRepository for FileTransformationRepository {
    async fn list(&self) -> Result<Vec<Transformation>, SiteError> {
        Ok(self.file.load_or_seed(default_transformations).await?)
    }

    async fn append(&self, transformation: &Transformation) -> Result<(), SiteError> {
        Ok(self
            .file
            .append_or_seed(transformation.clone(), default_transformations)
            .await?)
    }
}
