//! Load-mutate-commit loop over the presentation aggregate.
//!
//! Every write goes through `PresentationMutator::mutate`: load the current
//! aggregate, apply the change in memory, then compare-and-swap it back on
//! its revision. A conflicting concurrent commit causes a fresh reload and a
//! replay of the change, up to `max_attempts` times. Domain errors abort
//! immediately and are never retried.
//!
//! Writers to the same presentation inside one process queue on a
//! per-presentation lock, so the revision check only races against other
//! processes sharing the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::domain::foundation::{PresentationId, SessionId, TenantId};
use crate::domain::presentation::{Presentation, PresentationError};
use crate::ports::PresentationRepository;

/// How to find the aggregate a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Presentation(PresentationId),
    Session(SessionId),
}

impl From<PresentationId> for Locator {
    fn from(id: PresentationId) -> Self {
        Locator::Presentation(id)
    }
}

impl From<SessionId> for Locator {
    fn from(id: SessionId) -> Self {
        Locator::Session(id)
    }
}

pub struct PresentationMutator {
    repository: Arc<dyn PresentationRepository>,
    max_attempts: u32,
    write_locks: StdMutex<HashMap<PresentationId, Arc<Mutex<()>>>>,
}

impl PresentationMutator {
    pub fn new(repository: Arc<dyn PresentationRepository>, max_attempts: u32) -> Self {
        Self {
            repository,
            max_attempts: max_attempts.max(1),
            write_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &Arc<dyn PresentationRepository> {
        &self.repository
    }

    /// Loads the aggregate addressed by `locator` within `tenant_id`.
    ///
    /// # Errors
    ///
    /// - `PresentationNotFound` / `SessionNotFound` if nothing matches
    pub async fn load(
        &self,
        tenant_id: &TenantId,
        locator: Locator,
    ) -> Result<Presentation, PresentationError> {
        match locator {
            Locator::Presentation(id) => self
                .repository
                .find_by_id(tenant_id, id)
                .await?
                .ok_or(PresentationError::PresentationNotFound(id)),
            Locator::Session(id) => self
                .repository
                .find_by_session(tenant_id, id)
                .await?
                .ok_or(PresentationError::SessionNotFound(id)),
        }
    }

    /// Applies `change` and commits it, retrying on revision conflicts.
    ///
    /// Returns the committed aggregate and whatever `change` produced.
    ///
    /// # Errors
    ///
    /// - any error returned by `change`, unretried
    /// - `PersistenceConflict` once every attempt lost the race
    pub async fn mutate<T, F>(
        &self,
        tenant_id: &TenantId,
        locator: Locator,
        mut change: F,
    ) -> Result<(Presentation, T), PresentationError>
    where
        F: FnMut(&mut Presentation) -> Result<T, PresentationError> + Send,
        T: Send,
    {
        // A session never moves between presentations, so resolve it once.
        let presentation_id = match locator {
            Locator::Presentation(id) => id,
            Locator::Session(_) => self.load(tenant_id, locator).await?.id(),
        };

        for attempt in 1..=self.max_attempts {
            let guard = self.lock(presentation_id).await;
            let outcome = self.try_commit(tenant_id, locator, &mut change).await;
            self.unlock(presentation_id, guard);

            match outcome? {
                Some(committed) => return Ok(committed),
                None => {
                    debug!(
                        %presentation_id,
                        attempt,
                        max_attempts = self.max_attempts,
                        "revision conflict, retrying"
                    );
                }
            }
        }

        warn!(
            ?locator,
            attempts = self.max_attempts,
            "giving up after repeated revision conflicts"
        );
        Err(PresentationError::PersistenceConflict(format!(
            "{:?} kept changing concurrently; gave up after {} attempts",
            locator, self.max_attempts
        )))
    }

    /// One load-mutate-update pass. `None` means another writer committed first.
    async fn try_commit<T, F>(
        &self,
        tenant_id: &TenantId,
        locator: Locator,
        change: &mut F,
    ) -> Result<Option<(Presentation, T)>, PresentationError>
    where
        F: FnMut(&mut Presentation) -> Result<T, PresentationError> + Send,
        T: Send,
    {
        let mut presentation = self.load(tenant_id, locator).await?;
        let output = change(&mut presentation)?;

        match self.repository.update(tenant_id, &presentation).await {
            Ok(revision) => {
                presentation.set_revision(revision);
                Ok(Some((presentation, output)))
            }
            Err(e) if e.is_conflict() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn lock(&self, id: PresentationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.write_locks.lock().unwrap_or_else(|p| p.into_inner());
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Releases the guard and forgets the lock once nobody else holds or awaits it.
    fn unlock(&self, id: PresentationId, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.write_locks.lock().unwrap_or_else(|p| p.into_inner());
        if locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.write_locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPresentationRepository;
    use crate::config::EngineConfig;
    use crate::domain::foundation::{DomainError, Timestamp, UserId};
    use crate::domain::presentation::{NewSlide, PresentationSettings, PresentationSummary};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn tenant() -> TenantId {
        TenantId::new("acme").unwrap()
    }

    fn presentation() -> Presentation {
        Presentation::create(
            tenant(),
            UserId::new("author").unwrap(),
            "Deck".to_string(),
            None,
            vec![NewSlide::content("One")],
            PresentationSettings::default(),
            Timestamp::now(),
        )
        .unwrap()
    }

    /// Fails the first `conflicts` updates with a revision conflict.
    struct FlakyRepository {
        inner: InMemoryPresentationRepository,
        conflicts: AtomicU32,
        updates: AtomicU32,
    }

    impl FlakyRepository {
        fn new(conflicts: u32) -> Self {
            Self {
                inner: InMemoryPresentationRepository::new(),
                conflicts: AtomicU32::new(conflicts),
                updates: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl PresentationRepository for FlakyRepository {
        async fn save(&self, t: &TenantId, p: &Presentation) -> Result<(), DomainError> {
            self.inner.save(t, p).await
        }

        async fn update(&self, t: &TenantId, p: &Presentation) -> Result<u64, DomainError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            let remaining = self.conflicts.load(Ordering::SeqCst);
            if remaining > 0 {
                self.conflicts.store(remaining - 1, Ordering::SeqCst);
                return Err(DomainError::conflict("simulated"));
            }
            self.inner.update(t, p).await
        }

        async fn find_by_id(
            &self,
            t: &TenantId,
            id: PresentationId,
        ) -> Result<Option<Presentation>, DomainError> {
            self.inner.find_by_id(t, id).await
        }

        async fn find_by_session(
            &self,
            t: &TenantId,
            id: SessionId,
        ) -> Result<Option<Presentation>, DomainError> {
            self.inner.find_by_session(t, id).await
        }

        async fn list_by_tenant(
            &self,
            t: &TenantId,
        ) -> Result<Vec<PresentationSummary>, DomainError> {
            self.inner.list_by_tenant(t).await
        }
    }

    #[tokio::test]
    async fn retries_until_commit_succeeds() {
        let repo = Arc::new(FlakyRepository::new(2));
        let p = presentation();
        repo.save(&tenant(), &p).await.unwrap();
        let mutator = PresentationMutator::new(repo.clone(), 5);

        let (committed, _) = mutator
            .mutate(&tenant(), p.id().into(), |p| {
                p.add_slide(NewSlide::content("Two"), Timestamp::now())
            })
            .await
            .unwrap();

        assert_eq!(repo.updates.load(Ordering::SeqCst), 3);
        assert_eq!(committed.slide_count(), 2);
        assert_eq!(committed.revision(), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_persistence_conflict() {
        let repo = Arc::new(FlakyRepository::new(10));
        let p = presentation();
        repo.save(&tenant(), &p).await.unwrap();
        let mutator = PresentationMutator::new(repo.clone(), 3);

        let result = mutator
            .mutate(&tenant(), p.id().into(), |_| Ok(()))
            .await;

        assert!(matches!(result, Err(PresentationError::PersistenceConflict(_))));
        assert_eq!(repo.updates.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn domain_errors_are_not_retried() {
        let repo = Arc::new(FlakyRepository::new(0));
        let p = presentation();
        repo.save(&tenant(), &p).await.unwrap();
        let mutator = PresentationMutator::new(repo.clone(), 5);

        let mut calls = 0;
        let result: Result<(Presentation, ()), _> = mutator
            .mutate(&tenant(), p.id().into(), |_| {
                calls += 1;
                Err(PresentationError::invalid_state("nope"))
            })
            .await;

        assert!(matches!(result, Err(PresentationError::InvalidState(_))));
        assert_eq!(calls, 1);
        assert_eq!(repo.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_all_commit_with_default_attempts() {
        const WRITERS: usize = 128;

        let repo = Arc::new(InMemoryPresentationRepository::new());
        let p = presentation();
        repo.save(&tenant(), &p).await.unwrap();
        let mutator = Arc::new(PresentationMutator::new(
            repo.clone(),
            EngineConfig::default().max_commit_attempts,
        ));

        let tasks: Vec<_> = (0..WRITERS)
            .map(|i| {
                let mutator = mutator.clone();
                let id = p.id();
                tokio::spawn(async move {
                    mutator
                        .mutate(&tenant(), id.into(), |p| {
                            p.add_slide(NewSlide::content(format!("Slide {i}")), Timestamp::now())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = repo.find_by_id(&tenant(), p.id()).await.unwrap().unwrap();
        assert_eq!(stored.slide_count(), 1 + WRITERS);
        assert_eq!(stored.revision(), WRITERS as u64);
        assert_eq!(mutator.tracked_locks(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn session_writers_serialize_without_retries() {
        const WRITERS: u32 = 100;

        let repo = Arc::new(FlakyRepository::new(0));
        let mut p = presentation();
        let session_id = p
            .create_session(UserId::new("host").unwrap(), None, Timestamp::now(), Timestamp::now())
            .unwrap();
        repo.save(&tenant(), &p).await.unwrap();
        let mutator = Arc::new(PresentationMutator::new(repo.clone(), 1));

        let tasks: Vec<_> = (0..WRITERS)
            .map(|_| {
                let mutator = mutator.clone();
                tokio::spawn(async move {
                    mutator
                        .mutate(&tenant(), session_id.into(), |p| {
                            p.record_view();
                            Ok(())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(repo.updates.load(Ordering::SeqCst), WRITERS);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let mutator = PresentationMutator::new(Arc::new(InMemoryPresentationRepository::new()), 3);
        let missing = SessionId::new();
        let result = mutator.load(&tenant(), missing.into()).await;
        assert_eq!(result.err(), Some(PresentationError::SessionNotFound(missing)));
    }
}
