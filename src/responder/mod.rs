use crate::conversation::ConversationId;
use crate::event::AppEvent;
use crate::persona::PersonaCatalog;
use rand::Rng;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::time::{self, Duration};
use tracing::debug;

/// Simulated latency between a submission and the canned reply.
pub const REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Source of reply-pool indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..bound`. `bound` is never zero: catalog
    /// construction rejects empty reply pools.
    fn next_index(&mut self, bound: usize) -> usize;
}

pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_index(&mut self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Produces persona welcomes and canned replies. Replies are a uniform
/// random draw over the persona's pool; the incoming text is accepted but
/// never inspected.
pub struct Responder {
    catalog: Arc<PersonaCatalog>,
    random: Mutex<Box<dyn RandomSource>>,
}

impl Responder {
    pub fn new(catalog: Arc<PersonaCatalog>) -> Self {
        Self::with_random_source(catalog, Box::new(ThreadRngSource))
    }

    pub fn with_random_source(catalog: Arc<PersonaCatalog>, random: Box<dyn RandomSource>) -> Self {
        Self {
            catalog,
            random: Mutex::new(random),
        }
    }

    pub fn welcome_for(&self, persona_id: &str) -> String {
        self.catalog.resolve(persona_id).welcome_text.clone()
    }

    pub fn reply_for(&self, persona_id: &str, _incoming_text: &str) -> String {
        let pool = &self.catalog.resolve(persona_id).reply_pool;
        let index = self
            .random
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_index(pool.len());
        pool[index].clone()
    }
}

/// One pending bot reply, addressed to the conversation that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub conversation: ConversationId,
    pub persona_id: String,
    pub incoming_text: String,
}

/// Deferred-reply capability handed to the conversation on submit.
pub trait ReplyScheduler {
    fn schedule(&self, request: ReplyRequest);
}

/// Production scheduler: each request becomes an independent tokio task
/// that sleeps through the artificial latency, draws a reply, and hands it
/// back to the UI thread as an `AppEvent`. Requests are never coalesced or
/// cancelled here; stale replies are dropped at delivery.
pub struct SpawnedReplyScheduler {
    runtime: Handle,
    responder: Arc<Responder>,
    tx: mpsc::Sender<AppEvent>,
}

impl SpawnedReplyScheduler {
    pub fn new(runtime: Handle, responder: Arc<Responder>, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            runtime,
            responder,
            tx,
        }
    }
}

impl ReplyScheduler for SpawnedReplyScheduler {
    fn schedule(&self, request: ReplyRequest) {
        debug!(
            "scheduling reply for persona {} on conversation {:?}",
            request.persona_id, request.conversation
        );

        let responder = Arc::clone(&self.responder);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            time::sleep(REPLY_DELAY).await;
            let text = responder.reply_for(&request.persona_id, &request.incoming_text);
            let _ = tx.send(AppEvent::BotReply {
                conversation: request.conversation,
                text,
            });
        });
    }
}

#[cfg(test)]
pub mod testing {
    use super::{RandomSource, ReplyRequest, ReplyScheduler};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays a fixed index sequence, making reply selection exact.
    pub struct ScriptedSource {
        indices: VecDeque<usize>,
    }

    impl ScriptedSource {
        pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
            Self {
                indices: indices.into_iter().collect(),
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_index(&mut self, bound: usize) -> usize {
            let index = self.indices.pop_front().unwrap_or(0);
            index % bound.max(1)
        }
    }

    /// Captures scheduled requests instead of spawning timers, so tests
    /// decide when (and whether) each reply is delivered.
    #[derive(Default)]
    pub struct RecordingScheduler {
        requests: RefCell<Vec<ReplyRequest>>,
    }

    impl RecordingScheduler {
        pub fn requests(&self) -> Vec<ReplyRequest> {
            self.requests.borrow().clone()
        }
    }

    impl ReplyScheduler for RecordingScheduler {
        fn schedule(&self, request: ReplyRequest) {
            self.requests.borrow_mut().push(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::{Responder, SpawnedReplyScheduler, ReplyRequest, ReplyScheduler};
    use crate::conversation::ConversationId;
    use crate::event::AppEvent;
    use crate::persona::PersonaCatalog;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    fn catalog() -> Arc<PersonaCatalog> {
        Arc::new(PersonaCatalog::builtin().expect("builtin catalog should parse"))
    }

    #[test]
    fn welcome_matches_catalog_entry() {
        let catalog = catalog();
        let responder = Responder::new(Arc::clone(&catalog));
        assert_eq!(
            responder.welcome_for("robi"),
            catalog.resolve("robi").welcome_text
        );
    }

    #[test]
    fn unknown_persona_uses_default_welcome_and_pool() {
        let catalog = catalog();
        let responder = Responder::new(Arc::clone(&catalog));
        let default = catalog.default_persona();

        assert_eq!(responder.welcome_for("xyz"), default.welcome_text);
        let reply = responder.reply_for("xyz", "merhaba");
        assert!(default.reply_pool.contains(&reply));
    }

    #[test]
    fn reply_is_always_a_member_of_the_persona_pool() {
        let catalog = catalog();
        let responder = Responder::new(Arc::clone(&catalog));
        let pool = &catalog.resolve("damla").reply_pool;

        for _ in 0..50 {
            let reply = responder.reply_for("damla", "su");
            assert!(pool.contains(&reply), "reply {reply:?} not in pool");
        }
    }

    #[test]
    fn reply_ignores_incoming_text_with_scripted_source() {
        let catalog = catalog();
        let responder = Responder::with_random_source(
            Arc::clone(&catalog),
            Box::new(ScriptedSource::new([2, 2])),
        );
        let pool = &catalog.resolve("robi").reply_pool;

        assert_eq!(responder.reply_for("robi", "first"), pool[2]);
        assert_eq!(responder.reply_for("robi", "completely different"), pool[2]);
    }

    #[test]
    fn spawned_scheduler_delivers_reply_event() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let catalog = catalog();
        let responder = Arc::new(Responder::new(Arc::clone(&catalog)));
        let scheduler =
            SpawnedReplyScheduler::new(runtime.handle().clone(), responder, tx);

        let conversation = ConversationId(7);
        scheduler.schedule(ReplyRequest {
            conversation,
            persona_id: "robi".to_string(),
            incoming_text: "merhaba".to_string(),
        });

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("reply event should arrive after the delay");
        let AppEvent::BotReply {
            conversation: delivered,
            text,
        } = event;
        assert_eq!(delivered, conversation);
        assert!(catalog.resolve("robi").reply_pool.contains(&text));
    }
}
