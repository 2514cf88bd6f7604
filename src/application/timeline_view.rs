// Timeline view - per-entity history and the sliding chart of the selected entity
use crate::application::animation::{Animation, AnimationState, Scheduler, TransitionToken};
use crate::application::counter_panel::CounterPanel;
use crate::application::view_model::{
    AxisTick, ChartFrame, ChartSkeleton, GlyphHandle, Point, SelectEvent, TimelineEffect,
};
use crate::domain::clock::{parse_start_date, SessionClock};
use crate::domain::entity::{is_pinned_name, EntityType};
use crate::domain::message::{SetupPayload, UpdatePayload};
use crate::domain::ring_buffer::RingBuffer;
use crate::domain::scale::{format_time_tick, time_ticks, LinearScale};
use crate::infrastructure::config::{CanvasConfig, SummaryConfig, TimelineConfig};
use std::collections::HashMap;
use std::time::Instant;

pub type Sample = Option<f64>;

#[derive(Debug)]
struct Selection {
    entity: String,
    glyph: GlyphHandle,
    axis_center: f64,
    /// Backing sequence of the drawn line; may exceed capacity mid-transition
    series: Vec<Sample>,
}

pub struct TimelineView {
    config: TimelineConfig,
    width: f64,
    height: f64,
    clock: Option<SessionClock>,
    history: HashMap<String, RingBuffer<Sample>>,
    selection: Option<Selection>,
    /// Samples of the selected entity received since the last tick
    pending: Vec<Sample>,
    animation: Animation,
    counters: CounterPanel,
}

impl TimelineView {
    pub fn new(config: TimelineConfig, summary: &SummaryConfig, canvas: &CanvasConfig) -> Self {
        let margin = config.margin;
        Self {
            width: canvas.width - margin.left - margin.right,
            height: canvas.timeline_height() - margin.top - margin.bottom,
            config,
            clock: None,
            history: HashMap::new(),
            selection: None,
            pending: Vec::new(),
            animation: Animation::default(),
            counters: CounterPanel::new(summary.min_interval()),
        }
    }

    /// Start over for a new topology; returns the teardown of any open chart
    pub fn init(&mut self, setup: &SetupPayload) -> Vec<TimelineEffect> {
        let start = parse_start_date(&setup.start_date).unwrap_or_else(|| {
            tracing::warn!("Unparseable start date {:?}, using the epoch", setup.start_date);
            0
        });
        let backlog = self.config.backlog(setup.timeline_hours);
        let interval_ms = (setup.update_interval * 1000.0).round() as i64;
        let mut clock = SessionClock::new(start, interval_ms, backlog);
        clock.advance(setup.time);
        self.clock = Some(clock);

        self.history = setup
            .nodes
            .iter()
            .map(|node| (node.name.clone(), RingBuffer::new(backlog.saturating_add(1), None)))
            .collect();
        self.pending.clear();
        self.animation.stop();
        self.counters = CounterPanel::new(self.counters.min_interval());
        tracing::info!(
            "Timeline initialized: backlog {} samples every {} ms",
            backlog,
            interval_ms
        );

        match self.selection.take() {
            Some(previous) => vec![
                TimelineEffect::CloseChart,
                TimelineEffect::Unhighlight(previous.glyph),
            ],
            None => Vec::new(),
        }
    }

    pub fn clock(&self) -> Option<&SessionClock> {
        self.clock.as_ref()
    }

    pub fn history(&self, entity: &str) -> Option<Vec<Sample>> {
        self.history.get(entity).map(RingBuffer::snapshot)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.entity.as_str())
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    fn capacity(&self) -> usize {
        self.clock.map(|c| c.backlog.saturating_add(1)).unwrap_or(1)
    }

    /// Toggle the chart for the clicked entity
    pub fn select(
        &mut self,
        event: SelectEvent,
        etype: &EntityType,
        configured: bool,
        scheduler: &mut dyn Scheduler,
    ) -> Vec<TimelineEffect> {
        let mut effects = Vec::new();
        let previous = self.selection.take();
        self.pending.clear();
        self.animation.stop();

        if let Some(previous) = previous {
            effects.push(TimelineEffect::CloseChart);
            effects.push(TimelineEffect::Unhighlight(previous.glyph));
            if previous.entity == event.entity {
                tracing::info!("Deselected {}", event.entity);
                return effects;
            }
        }

        let Some(clock) = self.clock else {
            tracing::warn!("Selection of {} before setup ignored", event.entity);
            return effects;
        };

        let mut title = event.entity.clone();
        if !configured {
            title.push_str(" [not configured]");
        }
        let axis_center = etype.axis_center();
        let series = self
            .history(&event.entity)
            .unwrap_or_else(|| vec![None; self.capacity()]);

        effects.push(TimelineEffect::Highlight(event.glyph));
        effects.push(TimelineEffect::OpenChart(ChartSkeleton {
            entity: event.entity.clone(),
            title,
            unit: etype.unit.clone(),
            x_domain: clock.window(),
            y_domain: (etype.min, etype.max),
            axis_center,
        }));

        tracing::info!("Selected {}", event.entity);
        self.selection = Some(Selection {
            entity: event.entity,
            glyph: event.glyph,
            axis_center,
            series,
        });
        self.animation.restart();
        if let Some(frame) = self.tick(scheduler) {
            effects.push(TimelineEffect::Frame(frame));
        }
        effects
    }

    /// Record the update in every entity's history and queue the selected
    /// entity's new samples for the next chart tick
    pub fn update(&mut self, data: &UpdatePayload, now: Instant) -> Vec<TimelineEffect> {
        let Some(clock) = self.clock.as_mut() else {
            tracing::warn!("Update before setup ignored");
            return Vec::new();
        };
        clock.advance(data.time);

        for snapshot in &data.node_data {
            for (name, reading) in snapshot {
                let Some(buffer) = self.history.get_mut(name) else {
                    tracing::debug!("Update for unknown entity {}", name);
                    continue;
                };
                let value = if is_pinned_name(name) {
                    Some(self.counters.record(&reading.value))
                } else {
                    reading.value.scalar()
                };
                buffer.push(value);
            }

            if let Some(selection) = &self.selection {
                if snapshot.contains_key(&selection.entity) {
                    if let Some(buffer) = self.history.get(&selection.entity) {
                        self.pending.push(*buffer.latest());
                    }
                }
            }
        }

        self.counters
            .maybe_emit(now)
            .map(TimelineEffect::Summary)
            .into_iter()
            .collect()
    }

    /// When the counter summary held back by the rate limit is due
    pub fn summary_due(&self) -> Option<Instant> {
        self.counters.next_due()
    }

    pub fn flush_summary(&mut self, now: Instant) -> Option<TimelineEffect> {
        self.counters.maybe_emit(now).map(TimelineEffect::Summary)
    }

    /// Continuation of a finished transition
    pub fn transition_finished(
        &mut self,
        token: TransitionToken,
        scheduler: &mut dyn Scheduler,
    ) -> Option<ChartFrame> {
        if !self.animation.is_current(token) {
            tracing::debug!("Ignoring stale transition {}", token.generation);
            return None;
        }
        let capacity = self.capacity();
        if let Some(selection) = self.selection.as_mut() {
            let excess = selection.series.len().saturating_sub(capacity);
            selection.series.drain(..excess);
        }
        self.tick(scheduler)
    }

    fn tick(&mut self, scheduler: &mut dyn Scheduler) -> Option<ChartFrame> {
        let token = self.animation.token()?;
        let (Some(selection), Some(clock)) = (self.selection.as_mut(), self.clock) else {
            self.animation.stop();
            return None;
        };

        selection.series.append(&mut self.pending);

        let center = selection.axis_center;
        let (lo, hi) = selection
            .series
            .iter()
            .flatten()
            .fold((center, center), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

        let x_domain = clock.window();
        let x = LinearScale::new((x_domain.0 as f64, x_domain.1 as f64), (0.0, self.width));
        let y = LinearScale::new((lo, hi), (self.height, 0.0));

        let points = selection
            .series
            .iter()
            .enumerate()
            .map(|(i, v)| v.map(|v| Point::new(x.apply(clock.sample_time(i) as f64), y.apply(v))))
            .collect();

        // Slide left by one sample width per sample beyond the window
        let last = selection.series.len().saturating_sub(1) as i64;
        let shift_x = x.apply((clock.current() - last * clock.interval_ms) as f64);

        let x_ticks = time_ticks(x_domain, self.config.max_time_ticks)
            .into_iter()
            .map(|t| AxisTick {
                position: x.apply(t as f64),
                label: format_time_tick(t),
            })
            .collect();
        let y_ticks = y
            .ticks(self.config.y_ticks)
            .into_iter()
            .map(|v| AxisTick {
                position: y.apply(v),
                label: format!("{}", v),
            })
            .collect();

        let transition = self.config.transition();
        scheduler.schedule(transition, token);

        Some(ChartFrame {
            x_domain,
            y_domain: (lo, hi),
            x_ticks,
            y_ticks,
            axis_y: y.apply(center),
            points,
            shift_x,
            transition,
        })
    }
}
