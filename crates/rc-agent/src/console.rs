//! Interactive console and connection-report rendering.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;

use crate::agent::ChatAgent;
use rc_protocol::ConnectionReport;

const RULE: &str = "==================================================";

/// One line of console input, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Quit,
    Help,
    Empty,
    Query(&'a str),
}

impl<'a> ConsoleCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "quit" | "exit" | "bye" => ConsoleCommand::Quit,
            "help" | "capabilities" => ConsoleCommand::Help,
            "" => ConsoleCommand::Empty,
            _ => ConsoleCommand::Query(trimmed),
        }
    }
}

/// Short per-service summary printed when the console starts.
pub fn write_connection_summary(report: &ConnectionReport, out: &mut impl Write) -> io::Result<()> {
    for (service, status) in report.services() {
        if status.is_connected() {
            writeln!(out, "[ok] {}: Connected", capitalize(service))?;
            if let Some(cluster) = &status.cluster_info {
                writeln!(
                    out,
                    "     Cluster: {} datanodes, {} containers, {} pipelines",
                    count(cluster.total_datanodes),
                    count(cluster.containers),
                    count(cluster.pipelines),
                )?;
            }
        } else {
            writeln!(
                out,
                "[!!] {}: {}",
                capitalize(service),
                status.message.as_deref().unwrap_or("Connection failed")
            )?;
        }
    }
    Ok(())
}

/// Detailed report for `--test-connections`.
pub fn write_connection_details(report: &ConnectionReport, out: &mut impl Write) -> io::Result<()> {
    for (service, status) in report.services() {
        writeln!(out, "\n{}:", service.to_uppercase())?;
        if status.is_connected() {
            writeln!(out, "  Status: Connected")?;
            if let Some(cluster) = &status.cluster_info {
                writeln!(
                    out,
                    "  Datanodes: {} total, {} healthy",
                    count(cluster.total_datanodes),
                    count(cluster.healthy_datanodes),
                )?;
                writeln!(out, "  Containers: {}", count(cluster.containers))?;
                writeln!(out, "  Pipelines: {}", count(cluster.pipelines))?;
            }
        } else {
            writeln!(
                out,
                "  Status: {}",
                status.message.as_deref().unwrap_or("Connection failed")
            )?;
        }
    }
    Ok(())
}

/// Lines typed on stdin, as read by [`stdin_lines`].
pub type InputLines = mpsc::Receiver<io::Result<String>>;

/// Read stdin on its own thread and forward each line.
///
/// A blocking read cannot be cancelled, so it stays off the runtime; the
/// thread is left behind when the console returns. The channel closes at
/// end of input.
pub fn stdin_lines() -> io::Result<InputLines> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Start an interactive session: test connections, then chat.
///
/// Returns without chatting when Recon is unreachable.
pub async fn interactive<S, W>(
    agent: &ChatAgent,
    lines: InputLines,
    shutdown: S,
    out: &mut W,
) -> io::Result<()>
where
    S: Future<Output = ()>,
    W: Write,
{
    writeln!(out, "Ozone Recon Chatbot starting...")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Testing connections...")?;
    out.flush()?;

    let report = agent.test_connections().await;
    write_connection_summary(&report, out)?;
    if !report.recon.is_connected() {
        writeln!(out, "     Make sure Recon is running and accessible")?;
        return Ok(());
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Chat started! Type 'help' for capabilities, 'quit' to exit.")?;
    writeln!(out, "{RULE}")?;

    chat_loop(agent, lines, shutdown, out).await
}

/// Read-eval-print loop over `lines`.
///
/// `shutdown` firing, while waiting for input or while a query runs, ends
/// the session, as does end of input. A read error is reported and the loop
/// keeps going.
pub async fn chat_loop<S, W>(
    agent: &ChatAgent,
    mut lines: InputLines,
    shutdown: S,
    out: &mut W,
) -> io::Result<()>
where
    S: Future<Output = ()>,
    W: Write,
{
    tokio::pin!(shutdown);

    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        let read = tokio::select! {
            read = lines.recv() => read,
            _ = &mut shutdown => {
                writeln!(out, "\nGoodbye!")?;
                return Ok(());
            }
        };

        let line = match read {
            Some(Ok(line)) => line,
            None => {
                writeln!(out, "\nGoodbye!")?;
                return Ok(());
            }
            Some(Err(e)) => {
                writeln!(out, "\nError: {e}")?;
                continue;
            }
        };

        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            ConsoleCommand::Help => {
                writeln!(out, "\nAssistant:\n{}", agent.capabilities())?;
            }
            ConsoleCommand::Empty => {}
            ConsoleCommand::Query(query) => {
                let response = tokio::select! {
                    response = agent.process_query(query) => response,
                    _ = &mut shutdown => {
                        writeln!(out, "\nGoodbye!")?;
                        return Ok(());
                    }
                };
                writeln!(out, "\nAssistant: {response}")?;
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use std::future::pending;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::docs::ApiDocs;
    use crate::llm::LanguageModel;
    use crate::mock::{MockRecon, ScriptedModel};
    use rc_protocol::{ClusterSummary, ConnectionStatus, ToolCall, ToolCallError};
    use serde_json::json;

    fn agent_with(llm: Arc<dyn LanguageModel>, recon: Arc<MockRecon>) -> ChatAgent {
        ChatAgent::new(ApiDocs::new("openapi: 3.0.0", ""), llm, recon)
    }

    /// Channel pre-filled with `input`, closed after the last line.
    fn lines_of(input: &str) -> InputLines {
        let (tx, rx) = mpsc::channel(input.lines().count().max(1));
        for line in input.lines() {
            tx.try_send(Ok(line.to_string())).unwrap();
        }
        rx
    }

    async fn run_loop(agent: &ChatAgent, input: &str) -> String {
        let mut out = Vec::new();
        chat_loop(agent, lines_of(input), pending(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Model whose endpoint selection never finishes.
    #[derive(Default)]
    struct StalledModel {
        select_calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModel for StalledModel {
        async fn select_endpoint(
            &self,
            _query: &str,
            _schema: &str,
            _guide: &str,
        ) -> Result<Option<ToolCall>, ToolCallError> {
            self.select_calls.fetch_add(1, Ordering::SeqCst);
            pending().await
        }

        async fn summarize(
            &self,
            _query: &str,
            _response: &serde_json::Value,
            _endpoint: &str,
        ) -> String {
            String::new()
        }

        async fn fallback(&self, _query: &str) -> String {
            "stalled".into()
        }

        fn model_name(&self) -> &str {
            "stalled"
        }
    }

    #[test]
    fn parse_commands() {
        assert_eq!(ConsoleCommand::parse("quit"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("  EXIT "), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("Bye"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("help"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse("Capabilities"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse("   "), ConsoleCommand::Empty);
        assert_eq!(
            ConsoleCommand::parse("  How many keys?  "),
            ConsoleCommand::Query("How many keys?")
        );
        assert_eq!(
            ConsoleCommand::parse("quit now"),
            ConsoleCommand::Query("quit now")
        );
    }

    #[tokio::test]
    async fn loop_handles_help_blank_query_and_quit() {
        let llm = Arc::new(ScriptedModel::selecting("/api/v1/datanodes").with_summary("5 datanodes."));
        let recon = Arc::new(MockRecon::new().with_response("/api/v1/datanodes", json!({"totalCount": 5})));
        let agent = agent_with(llm.clone(), recon.clone());

        let output = run_loop(&agent, "help\n\nList all datanodes\nquit\nList all datanodes\n").await;

        assert!(output.contains("I can help you get information"));
        assert!(output.contains("Assistant: 5 datanodes."));
        assert!(output.ends_with("Goodbye!\n"));
        assert_eq!(llm.select_calls(), 1, "input after quit must not be processed");
        assert_eq!(recon.execute_calls(), 1);
    }

    #[tokio::test]
    async fn loop_ends_at_end_of_input() {
        let llm = Arc::new(ScriptedModel::no_endpoint());
        let agent = agent_with(llm.clone(), Arc::new(MockRecon::new()));

        let output = run_loop(&agent, "what's the weather?\n").await;

        assert!(output.contains("I can only answer questions about Ozone Recon."));
        assert!(output.trim_end().ends_with("Goodbye!"));
        assert_eq!(llm.fallback_calls(), 1);
    }

    #[tokio::test]
    async fn ctrl_c_at_prompt_says_goodbye() {
        let llm = Arc::new(ScriptedModel::no_endpoint());
        let agent = agent_with(llm.clone(), Arc::new(MockRecon::new()));
        // Sender kept alive: the loop is waiting for input when the signal fires.
        let (_tx, rx) = mpsc::channel(1);

        let mut out = Vec::new();
        let result = chat_loop(
            &agent,
            rx,
            tokio::time::sleep(Duration::from_millis(20)),
            &mut out,
        )
        .await;
        let output = String::from_utf8(out).unwrap();

        assert!(result.is_ok());
        assert!(output.ends_with("You: \nGoodbye!\n"), "got: {output:?}");
        assert_eq!(llm.select_calls(), 0);
    }

    #[tokio::test]
    async fn ctrl_c_during_query_aborts_it() {
        let llm = Arc::new(StalledModel::default());
        let agent = agent_with(llm.clone(), Arc::new(MockRecon::new()));
        let (tx, rx) = mpsc::channel(1);
        tx.send(Ok("How many datanodes?".into())).await.unwrap();

        let mut out = Vec::new();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            chat_loop(
                &agent,
                rx,
                tokio::time::sleep(Duration::from_millis(50)),
                &mut out,
            ),
        )
        .await
        .expect("loop must return once interrupted");
        let output = String::from_utf8(out).unwrap();

        assert!(result.is_ok());
        assert_eq!(llm.select_calls.load(Ordering::SeqCst), 1);
        assert!(output.trim_end().ends_with("Goodbye!"));
        assert!(!output.contains("Assistant:"));
    }

    #[tokio::test]
    async fn read_error_is_reported_and_loop_continues() {
        let llm = Arc::new(ScriptedModel::no_endpoint());
        let agent = agent_with(llm.clone(), Arc::new(MockRecon::new()));
        let (tx, rx) = mpsc::channel(2);
        tx.try_send(Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8")))
            .unwrap();
        tx.try_send(Ok("quit".into())).unwrap();
        drop(tx);

        let mut out = Vec::new();
        chat_loop(&agent, rx, pending(), &mut out).await.unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Error: bad utf-8"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn interactive_stops_when_recon_offline() {
        let llm = Arc::new(ScriptedModel::no_endpoint());
        let agent = agent_with(llm.clone(), Arc::new(MockRecon::offline()));

        let mut out = Vec::new();
        interactive(
            &agent,
            lines_of("What's the cluster state?\n"),
            pending(),
            &mut out,
        )
        .await
        .unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("Recon: Cannot connect to Recon service"));
        assert!(output.contains("Make sure Recon is running"));
        assert!(!output.contains("Chat started"));
        assert_eq!(llm.select_calls(), 0);
    }

    #[tokio::test]
    async fn interactive_prints_cluster_counts() {
        let llm = Arc::new(ScriptedModel::no_endpoint());
        let recon = Arc::new(MockRecon::new().with_summary(Some(ClusterSummary {
            total_datanodes: Some(5),
            containers: Some(120),
            ..Default::default()
        })));
        let agent = agent_with(llm, recon);

        let mut out = Vec::new();
        interactive(&agent, lines_of("bye\n"), pending(), &mut out)
            .await
            .unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("[ok] Gemini: Connected"));
        assert!(output.contains("Cluster: 5 datanodes, 120 containers, ? pipelines"));
        assert!(output.contains("Chat started"));
    }

    #[test]
    fn details_report() {
        let report = ConnectionReport {
            gemini: ConnectionStatus::error("No response from Gemini"),
            recon: ConnectionStatus::connected().with_cluster_info(ClusterSummary {
                total_datanodes: Some(3),
                healthy_datanodes: Some(3),
                containers: Some(10),
                pipelines: Some(2),
                ..Default::default()
            }),
        };
        let mut out = Vec::new();
        write_connection_details(&report, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("GEMINI:\n  Status: No response from Gemini"));
        assert!(output.contains("RECON:\n  Status: Connected"));
        assert!(output.contains("Datanodes: 3 total, 3 healthy"));
        assert!(output.contains("Pipelines: 2"));
    }
}
