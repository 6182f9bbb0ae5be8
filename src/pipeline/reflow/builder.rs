//! Builder for the reflow pipeline.

use super::config::ReflowConfig;
use super::orchestration::Reflow;
use crate::core::{
    Component, NameRecognizer, PassthroughCorrector, ReflowResult, SpellCorrector, WordSegmenter,
};
use crate::domain::ReferenceNameDirectory;
use crate::processors::UnigramSegmenter;
use std::sync::{Arc, Once};
use tracing::{info, warn};

static THREAD_POOL_INIT: Once = Once::new();

/// Sizes rayon's global pool the first time it is called; later calls are
/// no-ops. `None` leaves rayon's default in place.
pub fn configure_thread_pool_once(max_threads: Option<usize>) {
    let Some(threads) = max_threads else {
        return;
    };
    THREAD_POOL_INIT.call_once(|| {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            Ok(()) => info!("rayon global pool sized to {} threads", threads),
            Err(e) => warn!("rayon global pool already initialized: {}", e),
        }
    });
}

/// Everything the stages share for a run: configuration plus loaded
/// collaborators. Built once, read-only afterwards.
#[derive(Debug)]
pub struct ReflowContext {
    pub config: ReflowConfig,
    pub segmenter: Component<Arc<dyn WordSegmenter>>,
    pub corrector: Component<Arc<dyn SpellCorrector>>,
    pub recognizer: Component<Arc<dyn NameRecognizer>>,
    pub directory: Component<ReferenceNameDirectory>,
}

/// Builder for [`Reflow`].
///
/// Collaborators passed explicitly take precedence over paths in the
/// configuration. A collaborator that is neither passed nor configured, or
/// whose resource fails to load, is recorded as unavailable: building still
/// succeeds, and only documents that need it fail.
#[derive(Debug, Default)]
pub struct ReflowBuilder {
    config: ReflowConfig,
    segmenter: Option<Arc<dyn WordSegmenter>>,
    corrector: Option<Arc<dyn SpellCorrector>>,
    recognizer: Option<Arc<dyn NameRecognizer>>,
    directory: Option<ReferenceNameDirectory>,
}

impl ReflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ReflowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn word_segmenter(mut self, segmenter: Arc<dyn WordSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Sets the spell corrector. Defaults to [`PassthroughCorrector`].
    pub fn spell_corrector(mut self, corrector: Arc<dyn SpellCorrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    pub fn name_recognizer(mut self, recognizer: Arc<dyn NameRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn reference_names(mut self, directory: ReferenceNameDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Validates the configuration, loads configured resources and builds the pipeline.
    pub fn build(self) -> ReflowResult<Reflow> {
        self.config.validate()?;
        configure_thread_pool_once(self.config.parallel.max_threads);

        let segmenter = match (self.segmenter, &self.config.text.word_frequencies_path) {
            (Some(segmenter), _) => Component::Ready(segmenter),
            (None, Some(path)) => Component::load("word segmenter", || {
                UnigramSegmenter::load(path).map(|s| Arc::new(s) as Arc<dyn WordSegmenter>)
            }),
            (None, None) => Component::unavailable(
                "word segmenter",
                "no segmenter given and text.word_frequencies_path not set",
            ),
        };

        let corrector: Arc<dyn SpellCorrector> = self
            .corrector
            .unwrap_or_else(|| Arc::new(PassthroughCorrector));

        let recognizer = match self.recognizer {
            Some(recognizer) => Component::Ready(recognizer),
            None => Component::unavailable("name recognizer", "no name recognizer given"),
        };

        let directory = match (self.directory, &self.config.names.author_names_path) {
            (Some(directory), _) => Component::Ready(directory),
            (None, Some(path)) => {
                Component::load("reference names", || ReferenceNameDirectory::load(path))
            }
            (None, None) => Component::unavailable(
                "reference names",
                "no directory given and names.author_names_path not set",
            ),
        };

        let context = ReflowContext {
            config: self.config,
            segmenter,
            corrector: Component::Ready(corrector),
            recognizer,
            directory,
        };
        Reflow::new(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ReflowError;

    #[test]
    fn test_build_without_collaborators_marks_them_unavailable() {
        let reflow = ReflowBuilder::new().build().unwrap();
        let context = reflow.context();
        assert!(!context.segmenter.is_ready());
        assert!(context.corrector.is_ready());
        assert!(!context.recognizer.is_ready());
        assert!(!context.directory.is_ready());
    }

    #[test]
    fn test_missing_resource_files_are_unavailable_not_fatal() {
        let mut config = ReflowConfig::default();
        config.text.word_frequencies_path = Some("/nonexistent/words.txt".into());
        config.names.author_names_path = Some("/nonexistent/names.txt".into());
        let reflow = ReflowBuilder::from_config(config).build().unwrap();
        let err = reflow.context().segmenter.get().unwrap_err();
        assert!(matches!(err, ReflowError::ComponentUnavailable { .. }));
        assert!(reflow.context().directory.get().is_err());
    }

    #[test]
    fn test_resources_loaded_from_config_paths() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.txt");
        let names = dir.path().join("names.txt");
        std::fs::write(&words, "the 100\ncat 20\n").unwrap();
        std::fs::write(&names, "Jane Doe\n").unwrap();

        let mut config = ReflowConfig::default();
        config.text.word_frequencies_path = Some(words);
        config.names.author_names_path = Some(names);
        let reflow = ReflowBuilder::from_config(config).build().unwrap();
        assert!(reflow.context().segmenter.is_ready());
        assert_eq!(reflow.context().directory.get().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let config = ReflowConfig {
            layouts: Vec::new(),
            ..ReflowConfig::default()
        };
        assert!(ReflowBuilder::from_config(config).build().is_err());
    }
}
