// Protocol dispatcher - the single event loop driving a session
use crate::application::connection::Connection;
use crate::application::session::Session;
use crate::application::surface::{ProgressIndicator, RenderSurface};
use crate::application::view_model::Point;
use crate::domain::message::GET_TOPOLOGY;
use crate::infrastructure::codec::decode_frame;
use crate::infrastructure::timer::{sleep_until_due, TimerSlot};
use futures::stream::{Stream, StreamExt};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// A user gesture on the topology
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    Click(String),
    Drag { name: String, to: Point },
    Release(String),
}

pub struct Dispatcher<C> {
    connection: C,
    layout_period: Duration,
}

impl<C: Connection> Dispatcher<C> {
    pub fn new(connection: C, layout_period: Duration) -> Self {
        Self {
            connection,
            layout_period,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Request the topology, then route frames, user input, transition
    /// continuations, held back summaries and layout ticks until the
    /// connection closes.
    pub async fn run<S, P, I>(
        &mut self,
        session: &mut Session<S, P>,
        mut input: I,
    ) -> anyhow::Result<()>
    where
        S: RenderSurface,
        P: ProgressIndicator,
        I: Stream<Item = UserInput> + Unpin,
    {
        if let Err(e) = self.connection.send_text(GET_TOPOLOGY).await {
            tracing::warn!("Failed to request topology: {:#}", e);
            session.connection_closed();
            return Ok(());
        }
        tracing::info!("Requested topology");

        let mut timer = TimerSlot::default();
        let mut layout = tokio::time::interval(self.layout_period);
        layout.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut input_open = true;

        loop {
            let summary_due = session.summary_due();
            tokio::select! {
                frame = self.connection.next_frame() => match frame {
                    Some(Ok(text)) => match decode_frame(&text) {
                        Ok(message) => session.handle(message, Instant::now()),
                        Err(e) => tracing::warn!("Dropping malformed frame: {}", e),
                    },
                    Some(Err(e)) => {
                        tracing::warn!("Connection failed: {:#}", e);
                        break;
                    }
                    None => break,
                },
                gesture = input.next(), if input_open => match gesture {
                    Some(UserInput::Click(name)) => session.click(&name, &mut timer),
                    Some(UserInput::Drag { name, to }) => session.drag(&name, to),
                    Some(UserInput::Release(name)) => session.release(&name),
                    None => {
                        tracing::debug!("User input closed");
                        input_open = false;
                    }
                },
                token = timer.expired() => {
                    timer.clear();
                    session.transition_finished(token, &mut timer);
                }
                _ = sleep_until_due(summary_due) => session.flush_summary(Instant::now()),
                _ = layout.tick(), if session.layout_running() => session.layout_tick(),
            }
        }

        session.connection_closed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::connection::testing::ScriptedConnection;
    use crate::application::surface::testing::{RecordingProgress, RecordingSurface, SurfaceCall};
    use crate::application::connection::Connection;
    use crate::infrastructure::config::ClientConfig;
    use async_trait::async_trait;

    const SETUP: &str = r#"["setup_topology", {
        "etypes": {"T": {"cls": "t", "min": 0, "max": 10, "unit": "W"}},
        "nodes": [{"name": "N1", "type": "T"}, {"name": "N2", "type": "U"}],
        "links": [{"source": "N1", "target": "N2", "length": 0}],
        "time": 0, "start_date": "2014-01-01T00:00:00Z",
        "update_interval": 60, "timeline_hours": 1}]"#;

    fn session() -> Session<RecordingSurface, RecordingProgress> {
        Session::new(
            &ClientConfig::default(),
            RecordingSurface::default(),
            RecordingProgress::default(),
        )
    }

    #[tokio::test]
    async fn test_requests_topology_and_routes_frames() {
        let connection = ScriptedConnection::new([
            SETUP,
            "garbage",
            r#"["heartbeat", {}]"#,
            r#"["update_data", {"progress": 50, "time": 60, "node_data": [{"N1": {"value": 7}}]}]"#,
        ]);
        let mut dispatcher = Dispatcher::new(connection, Duration::from_millis(16));
        let mut session = session();

        dispatcher
            .run(&mut session, futures::stream::pending())
            .await
            .unwrap();

        assert_eq!(dispatcher.connection().sent, vec![GET_TOPOLOGY.to_string()]);
        assert_eq!(session.registry().node("N1").unwrap().value, Some(7.0));
        assert_eq!(session.surface().calls[0], SurfaceCall::Legend(1));
        assert_eq!(
            session.progress().updates,
            vec![(0.0, 0.0), (50.0, 60.0), (0.0, 0.0)]
        );
    }

    #[tokio::test]
    async fn test_close_before_setup_resets_progress() {
        let mut dispatcher = Dispatcher::new(ScriptedConnection::default(), Duration::from_millis(16));
        let mut session = session();

        dispatcher
            .run(&mut session, futures::stream::empty())
            .await
            .unwrap();

        assert!(session.surface().calls.is_empty());
        assert_eq!(session.progress().updates, vec![(0.0, 0.0)]);
    }

    struct RefusingConnection;

    #[async_trait]
    impl Connection for RefusingConnection {
        async fn send_text(&mut self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("connection reset")
        }

        async fn next_frame(&mut self) -> Option<anyhow::Result<String>> {
            None
        }
    }

    #[tokio::test]
    async fn test_failed_request_resets_progress() {
        let mut dispatcher = Dispatcher::new(RefusingConnection, Duration::from_millis(16));
        let mut session = session();

        let result = dispatcher.run(&mut session, futures::stream::empty()).await;

        assert!(result.is_ok());
        assert_eq!(session.progress().updates, vec![(0.0, 0.0)]);
    }

    #[tokio::test]
    async fn test_quiet_stream_flushes_held_back_summary() {
        let setup = SETUP.replace(
            r#"{"name": "N2", "type": "U"}"#,
            r#"{"name": "N2", "type": "U"}, {"name": "CC", "type": "CC"}"#,
        );
        let counters = |time: i64, n1: i64| {
            format!(
                r#"["update_data", {{"progress": 0, "time": {}, "node_data": [{{"CC": {{"value": [{{"n1": {}}}]}}}}]}}]"#,
                time, n1
            )
        };
        let connection =
            ScriptedConnection::new([setup, counters(60, 3), counters(120, 5)]).hold_open();
        let mut config = ClientConfig::default();
        config.summary.min_interval_ms = 100;
        let mut session = Session::new(
            &config,
            RecordingSurface::default(),
            RecordingProgress::default(),
        );
        let mut dispatcher = Dispatcher::new(connection, Duration::from_millis(16));

        // The connection never closes; stop the loop once the summary had time to flush
        let run = dispatcher.run(&mut session, futures::stream::pending());
        assert!(tokio::time::timeout(Duration::from_millis(500), run).await.is_err());

        let summaries: Vec<i64> = session
            .surface()
            .calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Summary(summary) => Some(summary.totals.n1),
                _ => None,
            })
            .collect();
        assert_eq!(summaries, vec![5]);
    }
}
