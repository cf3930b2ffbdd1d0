mod artifact;

pub use artifact::{Artifact, ArtifactType, ArtifactVersion};
