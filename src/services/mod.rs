pub mod fuzzy;
pub mod normalizer;
pub mod posters;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use normalizer::TitleNormalizer;
pub use posters::PosterService;
pub use recommendations::Recommender;
pub use title_search::TitleMatcher;
