mod feedback;

pub use feedback::ArtifactFeedback;
