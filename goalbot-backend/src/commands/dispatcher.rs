//! Command dispatch: one incoming command in, one reply out.
//!
//! Store and AI failures are converted to chat replies here. Nothing below
//! this layer can take the process down once it has booted.

use super::types::{IncomingCommand, Reply};
use crate::ai::SmartRewriter;
use crate::config::GoalsConfig;
use crate::error::StoreError;
use crate::formatter;
use crate::goals::GoalStore;
use std::sync::Arc;

/// How many progress notes `view_progress` shows per objective.
const PROGRESS_WINDOW: usize = 5;

/// Dispatcher routing commands to the store and the AI collaborator.
pub struct CommandDispatcher {
    store: Arc<GoalStore>,
    rewriter: Arc<dyn SmartRewriter>,
    transport_limit: usize,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<GoalStore>,
        rewriter: Arc<dyn SmartRewriter>,
        config: &GoalsConfig,
    ) -> Self {
        Self {
            store,
            rewriter,
            transport_limit: config.transport_limit,
        }
    }

    /// Dispatch one command and produce the reply to deliver.
    pub async fn dispatch(&self, command: IncomingCommand) -> Reply {
        log::info!("[DISPATCH] {} from {}", command.name, command.author);

        match command.name.as_str() {
            "test" => Reply::text("I'm working! 🎉"),
            "set_objective" => self.set_objective(&command).await,
            "list" => self.list(&command),
            "add_progress" => self.add_progress(&command),
            "view_progress" => self.view_progress(&command),
            "help" => Reply::text(usage()),
            other => {
                log::debug!("[DISPATCH] Unknown command: {}", other);
                Reply::text(format!("Unknown command `{}`.\n\n{}", other, usage()))
            }
        }
    }

    async fn set_objective(&self, command: &IncomingCommand) -> Reply {
        let raw_text = command.args.trim();
        if raw_text.is_empty() {
            return Reply::text("Please provide objective text: `!set_objective <text>`");
        }
        log::debug!(
            "[DISPATCH] Objective text: {}",
            formatter::truncate_with_ellipsis(raw_text, 80)
        );

        // The AI call runs before any store lock is taken, never during.
        let (formatted_text, ai_note) = match self.rewriter.rewrite_smart(raw_text).await {
            Ok(text) => (text, None),
            Err(e) => {
                log::warn!("[DISPATCH] SMART rewrite unavailable: {}", e);
                (
                    raw_text.to_string(),
                    Some("Note: AI formatting was unavailable, so your original wording was stored."),
                )
            }
        };

        match self.store.append(&command.author, raw_text, &formatted_text) {
            Ok(objective) => {
                let mut body = format!(
                    "📋 Objective {} created\n\n{}",
                    objective.id,
                    formatter::bulletize(&objective.formatted_text)
                );
                if let Some(note) = ai_note {
                    body.push_str("\n\n");
                    body.push_str(note);
                }
                Reply::chunked(formatter::chunk_for_transport(&body, self.transport_limit))
            }
            Err(e) if e.is_validation() => Reply::text(format!("⚠️ {}", e)),
            Err(e) => self.store_failure("setting the objective", e),
        }
    }

    fn list(&self, command: &IncomingCommand) -> Reply {
        let args = command.args.trim();
        let page = if args.is_empty() {
            1
        } else {
            match args.parse::<usize>() {
                Ok(page) if page >= 1 => page,
                _ => return Reply::text("Page must be a positive number: `!list [page]`"),
            }
        };

        let total = self.store.count();
        if total == 0 {
            return Reply::text("No objectives set yet! Use `!set_objective` to create one.");
        }

        let items = self.store.list_page(page);
        let block = formatter::paginate(&items, page, total, self.store.page_size());
        Reply::chunked(formatter::chunk_for_transport(&block, self.transport_limit))
    }

    fn add_progress(&self, command: &IncomingCommand) -> Reply {
        let mut parts = command.args.trim().splitn(2, char::is_whitespace);
        let id = match parts.next().unwrap_or("").parse::<u64>() {
            Ok(id) => id,
            Err(_) => return Reply::text("Usage: `!add_progress <objective id> <update text>`"),
        };
        let text = parts.next().unwrap_or("").trim();

        match self.store.add_update(id, &command.author, text) {
            Ok(update) => Reply::text(format!(
                "📝 Progress recorded for objective {}:\n• {}",
                update.objective_id, update.text
            )),
            Err(e) if e.is_validation() => Reply::text(format!("⚠️ {}", e)),
            Err(e) => self.store_failure("recording progress", e),
        }
    }

    fn view_progress(&self, command: &IncomingCommand) -> Reply {
        let id = match command.args.trim().parse::<u64>() {
            Ok(id) => id,
            Err(_) => return Reply::text("Usage: `!view_progress <objective id>`"),
        };

        if self.store.get(id).is_none() {
            return Reply::text(format!("⚠️ {}", StoreError::ObjectiveNotFound(id)));
        }

        let updates = self.store.updates_for(id, PROGRESS_WINDOW);
        if updates.is_empty() {
            return Reply::text(format!(
                "No progress recorded for objective {} yet. Use `!add_progress {} <text>`.",
                id, id
            ));
        }

        let mut block = format!(
            "📝 Progress for objective {} (last {}):\n",
            id,
            updates.len()
        );
        for update in &updates {
            block.push_str(&format!(
                "• [{}] {}: {}\n",
                update.created_at.format("%Y-%m-%d"),
                update.author,
                update.text
            ));
        }
        Reply::chunked(formatter::chunk_for_transport(&block, self.transport_limit))
    }

    fn store_failure(&self, action: &str, e: StoreError) -> Reply {
        log::error!("[DISPATCH] Error while {}: {}", action, e);
        Reply::text(format!(
            "💥 Something went wrong while {}. Please try again or contact support.",
            action
        ))
    }
}

fn usage() -> String {
    "Available commands:\n\
     • `!set_objective <text>` - store a new objective, rewritten as a SMART goal\n\
     • `!list [page]` - browse stored objectives\n\
     • `!add_progress <id> <text>` - record a progress note on an objective\n\
     • `!view_progress <id>` - show recent progress for an objective\n\
     • `!test` - health check"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use async_trait::async_trait;
    use tempfile::tempdir;

    struct FixedRewriter(&'static str);

    #[async_trait]
    impl SmartRewriter for FixedRewriter {
        async fn rewrite_smart(&self, _objective_text: &str) -> Result<String, AiError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRewriter;

    #[async_trait]
    impl SmartRewriter for FailingRewriter {
        async fn rewrite_smart(&self, _objective_text: &str) -> Result<String, AiError> {
            Err(AiError::EmptyCompletion)
        }
    }

    fn dispatcher_with(
        dir: &std::path::Path,
        rewriter: Arc<dyn SmartRewriter>,
    ) -> (CommandDispatcher, Arc<GoalStore>) {
        let config = GoalsConfig {
            data_dir: dir.to_path_buf(),
            page_size: 3,
            transport_limit: 2000,
        };
        let store = Arc::new(GoalStore::open(&config).unwrap());
        (
            CommandDispatcher::new(Arc::clone(&store), rewriter, &config),
            store,
        )
    }

    #[tokio::test]
    async fn test_set_objective_persists_formatted_text() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(
            dir.path(),
            Arc::new(FixedRewriter("1. Structured Objective: grow revenue by 25% in Q1")),
        );

        let reply = dispatcher
            .dispatch(IncomingCommand::new("set_objective", "grow revenue", "alice"))
            .await;

        assert!(reply.first().contains("Objective 1 created"));
        assert!(reply.first().contains("grow revenue by 25%"));

        let stored = store.get(1).unwrap();
        assert_eq!(stored.raw_text, "grow revenue");
        assert!(stored.formatted_text.contains("25% in Q1"));
    }

    #[tokio::test]
    async fn test_set_objective_falls_back_when_ai_fails() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("set_objective", "grow revenue", "alice"))
            .await;

        // Persisted anyway, with the raw wording and an annotation.
        let stored = store.get(1).unwrap();
        assert_eq!(stored.formatted_text, stored.raw_text);
        assert!(reply.first().contains("AI formatting was unavailable"));
    }

    #[tokio::test]
    async fn test_set_objective_rejects_empty_text() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("set_objective", "   ", "alice"))
            .await;

        assert!(reply.first().contains("!set_objective <text>"));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let dir = tempdir().unwrap();
        let (dispatcher, _store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("list", "", "alice"))
            .await;
        assert_eq!(
            reply.first(),
            "No objectives set yet! Use `!set_objective` to create one."
        );
    }

    #[tokio::test]
    async fn test_list_pages_through_store() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));
        for i in 0..7 {
            let text = format!("objective {}", i);
            store.append("alice", &text, &text).unwrap();
        }

        let page3 = dispatcher
            .dispatch(IncomingCommand::new("list", "3", "alice"))
            .await;
        assert!(page3.first().contains("page 3 of 3"));
        assert!(page3.first().contains("Objective 7"));

        let page4 = dispatcher
            .dispatch(IncomingCommand::new("list", "4", "alice"))
            .await;
        assert!(page4.first().contains("out of range"));
    }

    #[tokio::test]
    async fn test_list_rejects_bad_page_argument() {
        let dir = tempdir().unwrap();
        let (dispatcher, _store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("list", "zero", "alice"))
            .await;
        assert!(reply.first().contains("positive number"));
    }

    #[tokio::test]
    async fn test_unknown_command_gets_usage() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("dance", "", "alice"))
            .await;
        assert!(reply.first().contains("Unknown command `dance`"));
        assert!(reply.first().contains("!set_objective"));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempdir().unwrap();
        let (dispatcher, _store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("test", "", "alice"))
            .await;
        assert_eq!(reply.first(), "I'm working! 🎉");
    }

    #[tokio::test]
    async fn test_progress_roundtrip() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));
        store.append("alice", "ship the beta", "ship the beta").unwrap();

        let added = dispatcher
            .dispatch(IncomingCommand::new("add_progress", "1 landed the API", "bob"))
            .await;
        assert!(added.first().contains("Progress recorded for objective 1"));

        let viewed = dispatcher
            .dispatch(IncomingCommand::new("view_progress", "1", "alice"))
            .await;
        assert!(viewed.first().contains("landed the API"));
        assert!(viewed.first().contains("bob"));
    }

    #[tokio::test]
    async fn test_add_progress_unknown_objective() {
        let dir = tempdir().unwrap();
        let (dispatcher, store) = dispatcher_with(dir.path(), Arc::new(FailingRewriter));

        let reply = dispatcher
            .dispatch(IncomingCommand::new("add_progress", "9 did a thing", "bob"))
            .await;
        assert!(reply.first().contains("no objective with id 9"));
        assert!(store.updates_for(9, PROGRESS_WINDOW).is_empty());
    }

    #[tokio::test]
    async fn test_long_reply_is_chunked() {
        let dir = tempdir().unwrap();
        let config = GoalsConfig {
            data_dir: dir.path().to_path_buf(),
            page_size: 3,
            transport_limit: 80,
        };
        let store = Arc::new(GoalStore::open(&config).unwrap());
        let dispatcher =
            CommandDispatcher::new(Arc::clone(&store), Arc::new(FailingRewriter), &config);

        let long_text = "push the quarterly report out the door ".repeat(4);
        store.append("alice", &long_text, &long_text).unwrap();

        let reply = dispatcher
            .dispatch(IncomingCommand::new("list", "", "alice"))
            .await;
        assert!(reply.chunks.len() > 1);
        assert!(reply.chunks.iter().all(|c| c.chars().count() <= 80));
    }
}
