//! End-to-end flows through the application handlers and the in-memory
//! adapters.

use std::sync::Arc;

use futures::future::join_all;

use live_presenter::adapters::events::InMemoryEventBus;
use live_presenter::adapters::memory::{InMemoryPollCatalog, InMemoryPresentationRepository};
use live_presenter::application::handlers::poll::{
    ActivatePollCommand, ActivatePollHandler, GetPollResultsHandler, GetPollResultsQuery,
    SubmitResponseCommand, SubmitResponseHandler,
};
use live_presenter::application::handlers::presentation::{
    CreatePresentationCommand, CreatePresentationHandler, EditSlidesHandler, RemoveSlideCommand,
};
use live_presenter::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, EndSessionCommand, SessionLifecycleHandler,
    StartSessionCommand,
};
use live_presenter::application::PresentationMutator;
use live_presenter::config::EngineConfig;
use live_presenter::domain::foundation::{
    CommandMetadata, PollId, PresentationId, SessionId, TenantId, Timestamp, UserId,
};
use live_presenter::domain::poll::{AnswerKind, PollDefinition, PollOption, ResponseValue};
use live_presenter::domain::presentation::{NewSlide, Presentation, PresentationSettings};
use live_presenter::domain::session::SessionStatus;
use live_presenter::ports::PresentationRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Engine {
    repo: Arc<InMemoryPresentationRepository>,
    polls: Arc<InMemoryPollCatalog>,
    bus: Arc<InMemoryEventBus>,
    mutator: Arc<PresentationMutator>,
}

impl Engine {
    fn new(max_attempts: u32) -> Self {
        let repo = Arc::new(InMemoryPresentationRepository::new());
        Self {
            mutator: Arc::new(PresentationMutator::new(repo.clone(), max_attempts)),
            repo,
            polls: Arc::new(InMemoryPollCatalog::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    fn activate(&self) -> ActivatePollHandler {
        ActivatePollHandler::new(self.mutator.clone(), self.polls.clone(), self.bus.clone())
    }

    fn submit(&self) -> SubmitResponseHandler {
        SubmitResponseHandler::new(self.mutator.clone(), self.polls.clone(), self.bus.clone())
    }

    async fn poll(&self, question: &str) -> PollId {
        let poll = PollDefinition::new(
            PollId::new(),
            question,
            AnswerKind::SingleChoice {
                options: vec![PollOption::new("yes", "Yes"), PollOption::new("no", "No")],
            },
        );
        self.polls.insert(&tenant(), poll.clone()).await;
        poll.id
    }

    async fn load(&self, id: PresentationId) -> Presentation {
        self.repo.find_by_id(&tenant(), id).await.unwrap().unwrap()
    }
}

fn tenant() -> TenantId {
    TenantId::new("acme").unwrap()
}

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(tenant(), user("presenter")).with_source("integration-test")
}

fn vote(session_id: SessionId, poll_id: PollId, name: &str, option: &str) -> SubmitResponseCommand {
    SubmitResponseCommand {
        session_id,
        poll_id,
        user_id: user(name),
        value: ResponseValue::SingleChoice {
            option: option.to_string(),
        },
    }
}

async fn running_session(engine: &Engine, slides: usize) -> (PresentationId, SessionId) {
    let created = CreatePresentationHandler::new(engine.repo.clone(), engine.bus.clone())
        .handle(
            CreatePresentationCommand {
                title: "All hands".to_string(),
                slides: (0..slides).map(|i| NewSlide::content(format!("S{}", i))).collect(),
                ..Default::default()
            },
            metadata(),
        )
        .await
        .unwrap();
    let presentation_id = created.presentation.id();

    let session = CreateSessionHandler::new(engine.mutator.clone(), engine.bus.clone())
        .handle(
            CreateSessionCommand {
                presentation_id,
                title: None,
                scheduled_for: None,
            },
            metadata(),
        )
        .await
        .unwrap()
        .session;
    SessionLifecycleHandler::new(engine.mutator.clone(), engine.bus.clone())
        .start(
            StartSessionCommand {
                session_id: session.id(),
            },
            metadata(),
        )
        .await
        .unwrap();

    (presentation_id, session.id())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn presentation_session_and_polls_end_to_end() {
    let engine = Engine::new(5);

    // Deck of three, then drop the middle slide.
    let created = CreatePresentationHandler::new(engine.repo.clone(), engine.bus.clone())
        .handle(
            CreatePresentationCommand {
                title: "Quarterly review".to_string(),
                slides: vec![
                    NewSlide::content("Intro"),
                    NewSlide::content("Numbers"),
                    NewSlide::content("Outlook"),
                ],
                ..Default::default()
            },
            metadata(),
        )
        .await
        .unwrap();
    let presentation_id = created.presentation.id();
    let original: Vec<_> = created.presentation.slides().iter().map(|s| s.id).collect();
    assert_eq!(created.presentation.version().to_string(), "1.0.0");

    EditSlidesHandler::new(engine.mutator.clone(), engine.bus.clone())
        .remove(
            RemoveSlideCommand {
                presentation_id,
                index: 1,
            },
            metadata(),
        )
        .await
        .unwrap();

    let deck = engine.load(presentation_id).await;
    let positions: Vec<_> = deck.slides().iter().map(|s| s.position).collect();
    let ids: Vec<_> = deck.slides().iter().map(|s| s.id).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(ids, vec![original[0], original[2]]);

    // Live session with two polls.
    let session_id = CreateSessionHandler::new(engine.mutator.clone(), engine.bus.clone())
        .handle(
            CreateSessionCommand {
                presentation_id,
                title: Some("Morning run".to_string()),
                scheduled_for: None,
            },
            metadata(),
        )
        .await
        .unwrap()
        .session
        .id();
    let lifecycle = SessionLifecycleHandler::new(engine.mutator.clone(), engine.bus.clone());
    lifecycle
        .start(StartSessionCommand { session_id }, metadata())
        .await
        .unwrap();

    let poll_a = engine.poll("Poll A").await;
    let poll_b = engine.poll("Poll B").await;
    let activate = engine.activate();
    activate
        .handle(
            ActivatePollCommand {
                session_id,
                poll_id: poll_a,
                slide_id: Some(ids[0]),
            },
            metadata(),
        )
        .await
        .unwrap();
    let second = activate
        .handle(
            ActivatePollCommand {
                session_id,
                poll_id: poll_b,
                slide_id: Some(ids[1]),
            },
            metadata(),
        )
        .await
        .unwrap();
    assert_eq!(second.closed_polls, vec![poll_a]);

    let board = engine.load(presentation_id).await;
    let polls = board.session(session_id).unwrap().polls();
    assert!(polls.activations()[0].state().deactivated_at().is_some());
    assert_eq!(polls.active().map(|p| p.poll_id()), Some(poll_b));

    let submit = engine.submit();
    submit.handle(vote(session_id, poll_b, "ana", "yes"), metadata()).await.unwrap();
    submit.handle(vote(session_id, poll_b, "ben", "no"), metadata()).await.unwrap();

    let results = GetPollResultsHandler::new(engine.repo.clone(), engine.polls.clone())
        .handle(GetPollResultsQuery {
            tenant_id: tenant(),
            session_id,
            poll_id: poll_b,
        })
        .await
        .unwrap();
    assert_eq!(results.results.response_count, 2);
    assert_eq!(results.definition.as_ref().unwrap().question, "Poll B");

    // Ending closes the open poll.
    let ended = lifecycle
        .end(EndSessionCommand { session_id }, metadata())
        .await
        .unwrap();
    assert_eq!(ended.session.status(), SessionStatus::Completed);
    assert_eq!(ended.closed_polls, vec![poll_b]);
    assert_eq!(ended.session.polls().active_count(), 0);
    assert_eq!(ended.statistics.total_sessions, 1);

    assert!(engine.bus.has_event("session.ended.v1"));
    assert_eq!(engine.bus.events_for_aggregate(&session_id.to_string()).len(), 7);
}

#[test]
fn rolling_session_duration_average() {
    let t0 = Timestamp::now();
    let mut presentation = Presentation::create(
        tenant(),
        user("author"),
        "Workshop".to_string(),
        None,
        vec![NewSlide::content("Only")],
        PresentationSettings::default(),
        t0,
    )
    .unwrap();

    let mut run_for = |minutes: i64| {
        let session = presentation
            .create_session(user("host"), None, t0, t0)
            .unwrap();
        presentation.start_session(session, t0).unwrap();
        presentation
            .end_session(session, t0.plus_minutes(minutes))
            .unwrap();
        presentation.statistics().average_session_duration
    };

    assert_eq!(run_for(10), 10.0);
    assert_eq!(run_for(20), 15.0);

    assert_eq!(presentation.statistics().total_sessions, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_are_all_recorded() {
    const VOTERS: usize = 120;

    let engine = Engine::new(EngineConfig::default().max_commit_attempts);
    let (presentation_id, session_id) = running_session(&engine, 1).await;
    let poll_id = engine.poll("Ship it?").await;
    engine
        .activate()
        .handle(
            ActivatePollCommand {
                session_id,
                poll_id,
                slide_id: None,
            },
            metadata(),
        )
        .await
        .unwrap();

    let submit = Arc::new(engine.submit());
    let tasks = (0..VOTERS).map(|i| {
        let submit = submit.clone();
        tokio::spawn(async move {
            let option = if i % 2 == 0 { "yes" } else { "no" };
            submit
                .handle(vote(session_id, poll_id, &format!("voter-{}", i), option), metadata())
                .await
        })
    });

    for outcome in join_all(tasks).await {
        assert!(outcome.unwrap().is_ok());
    }

    let presentation = engine.load(presentation_id).await;
    let results = presentation.poll_results(session_id, poll_id).unwrap();
    assert_eq!(results.response_count, VOTERS);
    assert_eq!(results.tally.choice_counts.get("yes"), Some(&(VOTERS as u32 / 2)));
    assert_eq!(presentation.revision() as usize, 1 + 1 + 1 + VOTERS);
}
