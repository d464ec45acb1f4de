//! Command execution for redis-lsp
//!
//! Runs a script typed in the editor against the store: the text goes through
//! the parser, every statement is flattened into positional arguments and the
//! commands are sent one by one, in order.

mod result;

pub use result::ExecutionOutcome;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::connection::StoreClient;
use crate::error::{ParseError, RedisLspError, Result};
use crate::parser::{Command, Parser};

/// Executes scripts against a store client
pub struct CommandExecutor {
    /// Client the commands are sent to
    client: Arc<dyn StoreClient>,
    parser: Parser,
}

impl CommandExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    /// * `client` - Store client used to run commands
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            parser: Parser::new(),
        }
    }

    /// Turn script text into the commands that would be run
    ///
    /// Text without any token yields no command.
    pub fn plan(&self, text: &str) -> Result<Vec<Command>> {
        match self.parser.parse(text) {
            Ok(statements) => Ok(Command::from_statements(&statements)),
            Err(RedisLspError::Parse(ParseError::EmptyInput)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Run every command of `text` in order.
    ///
    /// Returns one outcome per command sent. Stops after the first nil reply or
    /// failure.
    pub async fn run(&self, text: &str) -> Result<Vec<ExecutionOutcome>> {
        let commands = self.plan(text)?;
        info!(commands = commands.len(), "executing script");

        let mut outcomes = Vec::with_capacity(commands.len());
        for command in &commands {
            let start = Instant::now();
            let outcome = match self.client.execute(command.args()).await {
                Ok(reply) => ExecutionOutcome::from(reply),
                Err(e) => ExecutionOutcome::Failed(e.to_string()),
            };

            debug!(
                command = %command,
                elapsed_ms = start.elapsed().as_millis() as u64,
                ?outcome,
                "executed command"
            );

            let stop = !outcome.is_success();
            outcomes.push(outcome);
            if stop {
                break;
            }
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Reply;
    use crate::error::ConnectionError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store answering GET/SET and failing on anything else
    #[derive(Default)]
    struct MemoryStore {
        data: Mutex<HashMap<String, String>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl MemoryStore {
        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StoreClient for MemoryStore {
        async fn execute(&self, args: &[String]) -> Result<Reply> {
            self.calls.lock().unwrap().push(args.to_vec());
            let mut data = self.data.lock().unwrap();

            match args {
                [cmd, key, value] if cmd.eq_ignore_ascii_case("SET") => {
                    data.insert(key.clone(), value.clone());
                    Ok(Reply::Value("OK".to_string()))
                }
                [cmd, key] if cmd.eq_ignore_ascii_case("GET") => {
                    Ok(data.get(key).cloned().map_or(Reply::Nil, Reply::Value))
                }
                [cmd, sub] if cmd == "ACL" && sub == "WHOAMI" => {
                    Ok(Reply::Value("default".to_string()))
                }
                _ => Err(ConnectionError::ConnectionFailed("unknown command".to_string()).into()),
            }
        }

        async fn users(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn keys(&self, _count: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn executor() -> (Arc<MemoryStore>, CommandExecutor) {
        let store = Arc::new(MemoryStore::default());
        let executor = CommandExecutor::new(store.clone());
        (store, executor)
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_statements_in_order() {
        let (store, executor) = executor();
        let outcomes = executor.run("SET greeting hello;GET greeting").await.unwrap();

        assert_eq!(
            outcomes,
            vec![
                ExecutionOutcome::Reply("OK".to_string()),
                ExecutionOutcome::Reply("hello".to_string()),
            ]
        );
        assert_eq!(
            store.calls(),
            vec![args(&["SET", "greeting", "hello"]), args(&["GET", "greeting"])]
        );
    }

    #[tokio::test]
    async fn test_compound_keywords_are_split() {
        let (store, executor) = executor();
        let outcomes = executor.run("ACL   WHOAMI").await.unwrap();

        assert_eq!(outcomes, vec![ExecutionOutcome::Reply("default".to_string())]);
        assert_eq!(store.calls(), vec![args(&["ACL", "WHOAMI"])]);
    }

    #[tokio::test]
    async fn test_stops_after_nil() {
        let (store, executor) = executor();
        let outcomes = executor.run("GET missing\nSET a 1").await.unwrap();

        assert_eq!(outcomes, vec![ExecutionOutcome::Nil]);
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stops_after_failure() {
        let (store, executor) = executor();
        let outcomes = executor.run("SET a 1\nFLUSHALL\nGET a").await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(&outcomes[1], ExecutionOutcome::Failed(msg) if msg.contains("unknown command")));
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_statements_are_skipped() {
        let (store, executor) = executor();
        let outcomes = executor.run("SET a 1;\n\n  ;GET a\n").await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_runs_nothing() {
        let (store, executor) = executor();
        assert!(executor.run("").await.unwrap().is_empty());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_plan_keeps_string_quotes() {
        let (_, executor) = executor();
        let plan = tokio_test::assert_ok!(executor.plan("SET k \"two words\""));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].args(), args(&["SET", "k", "\"two words\""]).as_slice());
    }

    #[test]
    fn test_run_outside_async_context() {
        let (_, executor) = executor();
        let outcomes = tokio_test::block_on(executor.run("SET x 1")).unwrap();
        assert_eq!(outcomes, vec![ExecutionOutcome::Reply("OK".to_string())]);
    }
}
