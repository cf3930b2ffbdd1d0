mod artifact_dto;

pub use artifact_dto::{
    ArtifactResponseDto, ArtifactSearchQuery, ArtifactVersionDto, CreateArtifactDto,
    CreateArtifactVersionDto,
};
