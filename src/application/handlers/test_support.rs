//! Shared fixtures for handler tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::{InMemoryPollCatalog, InMemoryPresentationRepository};
use crate::application::mutator::PresentationMutator;
use crate::domain::foundation::{
    CommandMetadata, DomainError, PollId, PresentationId, SessionId, TenantId, Timestamp, UserId,
};
use crate::domain::poll::{AnswerKind, PollDefinition, PollOption};
use crate::domain::presentation::{
    NewSlide, Presentation, PresentationSettings, PresentationSummary,
};
use crate::ports::{EventPublisher, PresentationRepository};

/// In-memory store whose next update can be made to lose a commit race.
pub(crate) struct RacingRepository {
    inner: Arc<InMemoryPresentationRepository>,
    armed: AtomicBool,
    lost_at: Mutex<Option<Timestamp>>,
}

#[async_trait]
impl PresentationRepository for RacingRepository {
    async fn save(&self, t: &TenantId, p: &Presentation) -> Result<(), DomainError> {
        self.inner.save(t, p).await
    }

    async fn update(&self, t: &TenantId, p: &Presentation) -> Result<u64, DomainError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
            *self.lost_at.lock().unwrap() = Some(Timestamp::now());
            return Err(DomainError::conflict("another writer committed first"));
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

    async fn list_by_tenant(&self, t: &TenantId) -> Result<Vec<PresentationSummary>, DomainError> {
        self.inner.list_by_tenant(t).await
    }
}

pub(crate) struct Harness {
    pub repo: Arc<InMemoryPresentationRepository>,
    pub bus: Arc<InMemoryEventBus>,
    pub polls: Arc<InMemoryPollCatalog>,
    pub mutator: Arc<PresentationMutator>,
    racing: Arc<RacingRepository>,
}

impl Harness {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryPresentationRepository::new());
        let racing = Arc::new(RacingRepository {
            inner: repo.clone(),
            armed: AtomicBool::new(false),
            lost_at: Mutex::new(None),
        });
        Self {
            mutator: Arc::new(PresentationMutator::new(racing.clone(), 5)),
            racing,
            repo,
            bus: Arc::new(InMemoryEventBus::new()),
            polls: Arc::new(InMemoryPollCatalog::new()),
        }
    }

    /// Makes the next commit fail with a revision conflict, forcing a retry.
    pub fn lose_next_commit(&self) {
        self.racing.armed.store(true, Ordering::SeqCst);
    }

    /// When the last lost commit was rejected.
    pub fn lost_commit_at(&self) -> Timestamp {
        self.racing.lost_at.lock().unwrap().expect("no commit was lost")
    }

    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.bus.clone()
    }

    pub fn metadata() -> CommandMetadata {
        CommandMetadata::test_fixture()
    }

    pub fn tenant() -> TenantId {
        Self::metadata().tenant_id
    }

    pub fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    pub async fn seed_presentation(&self, slides: usize) -> Presentation {
        let initial = (0..slides)
            .map(|i| NewSlide::content(format!("Slide {}", i)))
            .collect();
        let presentation = Presentation::create(
            Self::tenant(),
            Self::user("author"),
            "Seeded deck".to_string(),
            None,
            initial,
            PresentationSettings::default(),
            Timestamp::now(),
        )
        .unwrap();
        self.repo.save(&Self::tenant(), &presentation).await.unwrap();
        presentation
    }

    /// Seeds a presentation holding one scheduled session.
    pub async fn seed_session(&self, slides: usize) -> (PresentationId, SessionId) {
        let presentation = self.seed_presentation(slides).await;
        let (_, session_id) = self
            .mutator
            .mutate(&Self::tenant(), presentation.id().into(), |p| {
                let now = Timestamp::now();
                p.create_session(Self::user("host"), None, now, now)
            })
            .await
            .unwrap();
        (presentation.id(), session_id)
    }

    /// Seeds a presentation holding one in-progress session.
    pub async fn seed_running_session(&self, slides: usize) -> (PresentationId, SessionId) {
        let (presentation_id, session_id) = self.seed_session(slides).await;
        self.mutator
            .mutate(&Self::tenant(), session_id.into(), |p| {
                p.start_session(session_id, Timestamp::now())
            })
            .await
            .unwrap();
        (presentation_id, session_id)
    }

    pub async fn seed_choice_poll(&self) -> PollDefinition {
        let poll = PollDefinition::new(
            PollId::new(),
            "Ship it?",
            AnswerKind::SingleChoice {
                options: vec![PollOption::new("yes", "Yes"), PollOption::new("no", "No")],
            },
        );
        self.polls.insert(&Self::tenant(), poll.clone()).await;
        poll
    }

    pub async fn reload(&self, id: PresentationId) -> Presentation {
        self.repo
            .find_by_id(&Self::tenant(), id)
            .await
            .unwrap()
            .unwrap()
    }
}
