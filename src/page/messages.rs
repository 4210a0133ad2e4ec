use crate::env::{NodeId, Token};

/// Events delivered to the page by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A registered listener fired.
    Dom { token: Token, event: DomEvent },
    /// A timeout elapsed.
    Timer(Token),
    /// A requested animation frame arrived.
    Frame(Token),
    /// An intersection observer reported changes.
    Intersections {
        token: Token,
        entries: Vec<IntersectionEntry>,
    },
}

impl PageEvent {
    pub fn token(&self) -> Token {
        match self {
            PageEvent::Dom { token, .. }
            | PageEvent::Timer(token)
            | PageEvent::Frame(token)
            | PageEvent::Intersections { token, .. } => *token,
        }
    }
}

/// Payload of a DOM event, reduced to what the controllers read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Scroll,
    Resize,
    Click,
    KeyDown { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}
