//! Notification interface of the map widget linked to the chart.
//!
//! The chart never reads map state; it only tells the map what happened.

/// Receiver of chart interaction events.
pub trait MapCollaborator {
    /// A series became visible on the chart.
    fn accent(&mut self, key: &str);
    /// A series was removed from the chart by a click.
    fn remove_accent(&mut self, key: &str);
    /// The pointer is over a sample of `key`.
    fn mouse_move(&mut self, name: &str, key: &str);
    /// The pointer left the hovered sample.
    fn mouse_out(&mut self);
}

impl<M: MapCollaborator + ?Sized> MapCollaborator for &mut M {
    fn accent(&mut self, key: &str) {
        (**self).accent(key)
    }

    fn remove_accent(&mut self, key: &str) {
        (**self).remove_accent(key)
    }

    fn mouse_move(&mut self, name: &str, key: &str) {
        (**self).mouse_move(name, key)
    }

    fn mouse_out(&mut self) {
        (**self).mouse_out()
    }
}

impl<M: MapCollaborator + ?Sized> MapCollaborator for Box<M> {
    fn accent(&mut self, key: &str) {
        (**self).accent(key)
    }

    fn remove_accent(&mut self, key: &str) {
        (**self).remove_accent(key)
    }

    fn mouse_move(&mut self, name: &str, key: &str) {
        (**self).mouse_move(name, key)
    }

    fn mouse_out(&mut self) {
        (**self).mouse_out()
    }
}

/// One notification, as recorded by [`RecordingMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapCall {
    Accent(String),
    RemoveAccent(String),
    MouseMove { name: String, key: String },
    MouseOut,
}

/// Keeps every notification in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    calls: Vec<MapCall>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[MapCall] {
        &self.calls
    }

    /// Return and forget the calls seen so far.
    pub fn take(&mut self) -> Vec<MapCall> {
        std::mem::take(&mut self.calls)
    }
}

impl MapCollaborator for RecordingMap {
    fn accent(&mut self, key: &str) {
        self.calls.push(MapCall::Accent(key.to_string()));
    }

    fn remove_accent(&mut self, key: &str) {
        self.calls.push(MapCall::RemoveAccent(key.to_string()));
    }

    fn mouse_move(&mut self, name: &str, key: &str) {
        self.calls.push(MapCall::MouseMove {
            name: name.to_string(),
            key: key.to_string(),
        });
    }

    fn mouse_out(&mut self) {
        self.calls.push(MapCall::MouseOut);
    }
}

/// Writes notifications to the log, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMap;

impl MapCollaborator for LoggingMap {
    fn accent(&mut self, key: &str) {
        log::info!("map: accent {key}");
    }

    fn remove_accent(&mut self, key: &str) {
        log::info!("map: remove accent {key}");
    }

    fn mouse_move(&mut self, name: &str, key: &str) {
        log::info!("map: mousemove {name} ({key})");
    }

    fn mouse_out(&mut self) {
        log::info!("map: mouseout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<M: MapCollaborator>(mut map: M) {
        map.accent("A");
        map.mouse_move("Site A", "A");
        map.mouse_out();
    }

    #[test]
    fn recording_through_mut_ref() {
        let mut rec = RecordingMap::new();
        drive(&mut rec);
        assert_eq!(
            rec.take(),
            vec![
                MapCall::Accent("A".into()),
                MapCall::MouseMove {
                    name: "Site A".into(),
                    key: "A".into()
                },
                MapCall::MouseOut,
            ]
        );
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn boxed_dyn_collaborator() {
        let mut boxed: Box<dyn MapCollaborator> = Box::new(LoggingMap);
        boxed.remove_accent("A");
        drive(boxed);
    }
}
