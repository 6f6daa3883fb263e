//! Event system for navigation notifications

use crate::status::ErrorType;
use crate::waypoint::Waypoint;
use crate::world::ObjectId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Types of navigation events
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EventType {
    /// The agent reached the terminal waypoint
    Reached,
    /// The agent reached a non-terminal waypoint
    WaypointReached,
    /// A waypoint near the cursor became blocked
    Blocked,
    /// A failure condition occurred
    Error,
    /// Navigation was stopped explicitly
    Stopped,
}

impl EventType {
    /// Get the name of this event type
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Reached => "reached",
            Self::WaypointReached => "waypoint_reached",
            Self::Blocked => "blocked",
            Self::Error => "error",
            Self::Stopped => "stopped",
        }
    }

    /// Check if this event reports traversal progress
    #[inline]
    pub fn is_progress_event(&self) -> bool {
        matches!(self, Self::Reached | Self::WaypointReached)
    }

    /// Check if this event reports a problem
    #[inline]
    pub fn is_diagnostic_event(&self) -> bool {
        matches!(self, Self::Blocked | Self::Error)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "reached" => Self::Reached,
            "waypoint_reached" => Self::WaypointReached,
            "blocked" => Self::Blocked,
            "stopped" => Self::Stopped,
            _ => Self::Error,
        }
    }
}

/// Navigation event with associated data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEvent {
    /// Type of event
    pub event_type: EventType,
    /// Agent this event relates to
    pub agent: ObjectId,
    /// Waypoint the event refers to (final, next, or blocked waypoint)
    pub waypoint: Option<Waypoint>,
    /// Previously reached waypoint, for waypoint-reached events
    pub last_waypoint: Option<Waypoint>,
    /// Failure condition, for error events
    pub error: Option<ErrorType>,
    /// Human-readable message
    pub message: Option<String>,
}

impl NavEvent {
    /// Create a new navigation event
    pub fn new(event_type: EventType, agent: ObjectId) -> Self {
        Self {
            event_type,
            agent,
            waypoint: None,
            last_waypoint: None,
            error: None,
            message: None,
        }
    }

    /// Set the referenced waypoint
    #[inline]
    pub fn with_waypoint(mut self, waypoint: Waypoint) -> Self {
        self.waypoint = Some(waypoint);
        self
    }

    /// Set the previously reached waypoint
    #[inline]
    pub fn with_last_waypoint(mut self, waypoint: Waypoint) -> Self {
        self.last_waypoint = Some(waypoint);
        self
    }

    /// Set the message
    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Create a terminal-waypoint-reached event
    #[inline]
    pub fn reached(agent: ObjectId, final_waypoint: Waypoint) -> Self {
        Self::new(EventType::Reached, agent)
            .with_waypoint(final_waypoint)
            .with_message("Agent reached the target")
    }

    /// Create a waypoint-reached event
    #[inline]
    pub fn waypoint_reached(agent: ObjectId, last: Waypoint, next: Waypoint) -> Self {
        Self::new(EventType::WaypointReached, agent)
            .with_last_waypoint(last)
            .with_waypoint(next)
            .with_message(format!("Waypoint {} reached, moving to {}", last.index, next.index))
    }

    /// Create a blocked event
    #[inline]
    pub fn blocked(agent: ObjectId, blocked_waypoint: Waypoint) -> Self {
        Self::new(EventType::Blocked, agent)
            .with_waypoint(blocked_waypoint)
            .with_message(format!("Waypoint {} is blocked", blocked_waypoint.index))
    }

    /// Create an error event
    #[inline]
    pub fn error(agent: ObjectId, error: ErrorType) -> Self {
        let mut event = Self::new(EventType::Error, agent)
            .with_message(format!("Navigation error: {}", error.name()));
        event.error = Some(error);
        event
    }

    /// Create a stopped event
    #[inline]
    pub fn stopped(agent: ObjectId) -> Self {
        Self::new(EventType::Stopped, agent).with_message("Navigation stopped")
    }
}

/// Event listener trait for handling navigation events
pub trait EventListener {
    /// Handle a navigation event
    fn on_event(&mut self, event: &NavEvent);

    /// Get the event types this listener is interested in
    fn interested_events(&self) -> Vec<EventType> {
        // Default: interested in all events
        vec![]
    }

    /// Check if this listener is interested in a specific event type
    fn is_interested_in(&self, event_type: &EventType) -> bool {
        let interested = self.interested_events();
        interested.is_empty() || interested.contains(event_type)
    }
}

/// Handle identifying a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Shared listener handle; controllers run single-threaded and cooperative,
/// so `Rc<RefCell<..>>` is the ownership model.
pub type SharedListener = Rc<RefCell<dyn EventListener>>;

/// Event dispatcher for managing listeners and delivering events.
///
/// Dispatch is immediate and fire-and-forget. The listener list is
/// snapshotted before invocation, so subscribing or unsubscribing from
/// within a handler never invalidates an in-flight dispatch.
pub struct EventDispatcher {
    listeners: Vec<(ListenerId, SharedListener)>,
    next_id: u64,
    enabled: bool,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            enabled: true,
        }
    }

    /// Add an event listener, returning its handle
    pub fn add_listener(&mut self, listener: SharedListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener by handle; returns whether it was registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Remove all listeners
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Deliver an event to all interested listeners
    pub fn dispatch(&self, event: NavEvent) {
        if !self.enabled {
            return;
        }

        // Snapshot before invoking.
        let snapshot: Vec<SharedListener> = self
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            let mut listener = listener.borrow_mut();
            if listener.is_interested_in(&event.event_type) {
                listener.on_event(&event);
            }
        }
    }

    /// Enable or disable event dispatching
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if event dispatching is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Event listener that forwards events to the `log` crate
pub struct LoggingEventListener {
    interested_events: Vec<EventType>,
}

impl LoggingEventListener {
    /// Create a new logging event listener
    pub fn new() -> Self {
        Self {
            interested_events: vec![],
        }
    }

    /// Create a logging listener for specific event types
    pub fn for_events(events: Vec<EventType>) -> Self {
        Self {
            interested_events: events,
        }
    }
}

impl Default for LoggingEventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for LoggingEventListener {
    fn on_event(&mut self, event: &NavEvent) {
        log::debug!(
            "{}: agent {} - {}",
            event.event_type.name(),
            event.agent,
            event.message.as_deref().unwrap_or("no message")
        );
    }

    fn interested_events(&self) -> Vec<EventType> {
        self.interested_events.clone()
    }
}

/// Event listener that collects events for testing
pub struct CollectingEventListener {
    events: Vec<NavEvent>,
    interested_events: Vec<EventType>,
}

impl CollectingEventListener {
    /// Create a new collecting event listener
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            interested_events: vec![],
        }
    }

    /// Create a collecting listener for specific event types
    pub fn for_events(events: Vec<EventType>) -> Self {
        Self {
            events: Vec::new(),
            interested_events: events,
        }
    }

    /// Create a shareable collecting listener for dispatcher registration
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Get all collected events
    pub fn events(&self) -> &[NavEvent] {
        &self.events
    }

    /// Get the number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Clear collected events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &EventType) -> Vec<&NavEvent> {
        self.events
            .iter()
            .filter(|e| &e.event_type == event_type)
            .collect()
    }
}

impl Default for CollectingEventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for CollectingEventListener {
    fn on_event(&mut self, event: &NavEvent) {
        self.events.push(event.clone());
    }

    fn interested_events(&self) -> Vec<EventType> {
        self.interested_events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn waypoint(index: u32) -> Waypoint {
        Waypoint::new(index, Point3::new(index as f32, 0.0, 0.0))
    }

    #[test]
    fn test_event_type_classification() {
        assert!(EventType::Reached.is_progress_event());
        assert!(EventType::WaypointReached.is_progress_event());
        assert!(!EventType::Stopped.is_progress_event());

        assert!(EventType::Error.is_diagnostic_event());
        assert!(EventType::Blocked.is_diagnostic_event());
        assert!(!EventType::Reached.is_diagnostic_event());
    }

    #[test]
    fn test_event_creation() {
        let event = NavEvent::waypoint_reached(ObjectId(1), waypoint(0), waypoint(1));
        assert_eq!(event.event_type, EventType::WaypointReached);
        assert_eq!(event.agent, ObjectId(1));
        assert_eq!(event.last_waypoint.unwrap().index, 0);
        assert_eq!(event.waypoint.unwrap().index, 1);
        assert!(event.message.is_some());
    }

    #[test]
    fn test_error_event_carries_error_type() {
        let event = NavEvent::error(ObjectId(2), ErrorType::TargetUnreachable);
        assert_eq!(event.error, Some(ErrorType::TargetUnreachable));
        assert_eq!(event.event_type, EventType::Error);
    }

    #[test]
    fn test_dispatcher_delivers_to_listener() {
        let mut dispatcher = EventDispatcher::new();
        let listener = CollectingEventListener::shared();
        dispatcher.add_listener(listener.clone());

        dispatcher.dispatch(NavEvent::stopped(ObjectId(1)));

        assert_eq!(listener.borrow().event_count(), 1);
        assert_eq!(
            listener.borrow().events()[0].event_type,
            EventType::Stopped
        );
    }

    #[test]
    fn test_dispatcher_remove_listener() {
        let mut dispatcher = EventDispatcher::new();
        let listener = CollectingEventListener::shared();
        let id = dispatcher.add_listener(listener.clone());

        assert!(dispatcher.remove_listener(id));
        assert!(!dispatcher.remove_listener(id));

        dispatcher.dispatch(NavEvent::stopped(ObjectId(1)));
        assert_eq!(listener.borrow().event_count(), 0);
    }

    #[test]
    fn test_listener_filtering() {
        let mut dispatcher = EventDispatcher::new();
        let listener = Rc::new(RefCell::new(CollectingEventListener::for_events(vec![
            EventType::Error,
        ])));
        dispatcher.add_listener(listener.clone());

        dispatcher.dispatch(NavEvent::stopped(ObjectId(1)));
        dispatcher.dispatch(NavEvent::error(ObjectId(1), ErrorType::ComputationError));

        assert_eq!(listener.borrow().event_count(), 1);
        assert_eq!(listener.borrow().events()[0].event_type, EventType::Error);
    }

    #[test]
    fn test_disabled_dispatcher_drops_events() {
        let mut dispatcher = EventDispatcher::new();
        let listener = CollectingEventListener::shared();
        dispatcher.add_listener(listener.clone());

        dispatcher.set_enabled(false);
        dispatcher.dispatch(NavEvent::stopped(ObjectId(1)));
        assert_eq!(listener.borrow().event_count(), 0);
    }
}
