use anyhow::Result;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_config::{Config, ProviderKind, TranslationCredentials};
use crate::corpus::{LoadSummary, LoadedFile, SubtitleCorpus};
use crate::errors::{AppError, SearchError, SubtitleError};
use crate::file_utils::FileManager;
use crate::providers::ProbeOutcome;
use crate::search::{MatchRecord, SearchEngine, SearchResults};
use crate::translation_service::TranslationService;

// @module: Application controller owning corpus, results and translator

/// Kind of background task; at most one of each runs at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Search,
    Translation,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Search => "search",
            TaskKind::Translation => "translation",
        }
    }
}

/// A match together with its translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedMatch {
    pub record: MatchRecord,
    pub translation: String,
}

/// Message sent from a worker task back to the controller
#[derive(Debug)]
pub enum WorkerMessage {
    SearchFinished(Result<SearchResults, SearchError>),
    TextTranslated { original: String, translation: String },
    TranslationProgress { completed: usize, total: usize },
    ResultsTranslated(Vec<TranslatedMatch>),
}

impl WorkerMessage {
    /// Task that produced this message
    pub fn kind(&self) -> TaskKind {
        match self {
            WorkerMessage::SearchFinished(_) => TaskKind::Search,
            _ => TaskKind::Translation,
        }
    }
}

/// What the display layer gets after the controller applied a worker message
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    SearchCompleted(Arc<SearchResults>),
    TextTranslated { original: String, translation: String },
    TranslationProgress { completed: usize, total: usize },
    ResultsTranslated(Vec<TranslatedMatch>),
}

/// Main application controller
///
/// The controller is the only writer of the corpus and of the current result
/// set. Search and translation run on worker tasks that receive copies of what
/// they need at submission and report back through a channel; their results
/// are applied when the owner calls `next_event`.
pub struct Controller {
    // @field: Persisted settings and where to save them
    config: Config,
    config_path: Option<PathBuf>,

    // @field: Loaded subtitle files
    corpus: SubtitleCorpus,

    // @field: Active provider and credentials
    translator: TranslationService,

    // @field: Last completed search
    results: Option<Arc<SearchResults>>,

    // @field: Busy flags, one per task kind
    search_in_flight: bool,
    translation_in_flight: bool,

    // @field: Applied events not yet handed to the display layer
    pending: VecDeque<Result<ControllerEvent, AppError>>,

    // @field: Worker hand-off
    sender: mpsc::UnboundedSender<WorkerMessage>,
    receiver: mpsc::UnboundedReceiver<WorkerMessage>,
}

impl Controller {
    // @method: Create a new controller with the given configuration, not persisted
    pub fn with_config(config: Config) -> Self {
        let translator = TranslationService::from_config(&config);
        Self::with_translation_service(config, translator)
    }

    /// Create a controller around an already configured translation service
    pub fn with_translation_service(config: Config, translator: TranslationService) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            config,
            config_path: None,
            corpus: SubtitleCorpus::new(),
            translator,
            results: None,
            search_in_flight: false,
            translation_in_flight: false,
            pending: VecDeque::new(),
            sender,
            receiver,
        }
    }

    /// Create a controller whose settings are loaded from and saved to `path`
    pub fn with_config_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut controller = Self::with_config(Config::load(path));
        controller.config_path = Some(path.to_path_buf());
        controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn corpus(&self) -> &SubtitleCorpus {
        &self.corpus
    }

    pub fn translator(&self) -> &TranslationService {
        &self.translator
    }

    /// Last completed result set
    pub fn results(&self) -> Option<Arc<SearchResults>> {
        self.results.clone()
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Search => self.search_in_flight,
            TaskKind::Translation => self.translation_in_flight,
        }
    }

    /// Load one file from disk
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadedFile, SubtitleError> {
        self.corpus.load_path(path)
    }

    /// Load files and directories, reporting failures per file
    pub fn load_files<P: AsRef<Path>>(&mut self, inputs: &[P]) -> Result<LoadSummary> {
        let paths = FileManager::expand_inputs(inputs)?;
        let summary = self.corpus.load_paths(&paths);
        info!("{}", summary);
        Ok(summary)
    }

    /// Remove files by identifier, discarding the current results if anything went
    pub fn remove_files<I, S>(&mut self, identifiers: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.corpus.remove(identifiers);
        if removed > 0 {
            self.results = None;
        }
        info!("Removed {} file(s)", removed);
        removed
    }

    /// Remove every file and the current results
    pub fn clear_all(&mut self) {
        self.corpus.clear();
        self.results = None;
    }

    /// `(identifier, entry count)` in identifier order
    pub fn list_files(&self) -> Vec<(String, usize)> {
        self.corpus.list()
    }

    /// Start a search on a worker
    ///
    /// An invalid query is rejected here, before any work is scheduled.
    pub fn submit_search(&mut self, query: &str) -> Result<(), AppError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery { query: query.to_string() }.into());
        }
        self.begin(TaskKind::Search)?;

        let snapshot = self.corpus.clone();
        let query = query.to_string();
        let sender = self.sender.clone();
        tokio::task::spawn_blocking(move || {
            let result = SearchEngine::search(&snapshot, &query);
            Self::hand_off(&sender, WorkerMessage::SearchFinished(result));
        });
        Ok(())
    }

    /// Start translating a single text on a worker
    pub fn submit_translate(&mut self, text: &str) -> Result<(), AppError> {
        self.begin(TaskKind::Translation)?;

        let translator = self.translator.clone();
        let original = text.to_string();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let translation = translator.translate(&original).await;
            Self::hand_off(&sender, WorkerMessage::TextTranslated { original, translation });
        });
        Ok(())
    }

    /// Start translating every match of the current result set on a worker
    pub fn submit_translate_all(&mut self) -> Result<(), AppError> {
        let records = match &self.results {
            Some(results) if !results.is_empty() => results.matches.clone(),
            _ => return Err(AppError::NoResults),
        };
        self.begin(TaskKind::Translation)?;

        let translator = self.translator.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let texts: Vec<&str> = records.iter().map(|r| r.original_text.as_str()).collect();
            let translations = translator
                .translate_many_with_progress(&texts, |completed, total| {
                    Self::hand_off(&sender, WorkerMessage::TranslationProgress { completed, total });
                })
                .await;

            let translated = records
                .iter()
                .cloned()
                .zip(translations)
                .map(|(record, translation)| TranslatedMatch { record, translation })
                .collect();
            Self::hand_off(&sender, WorkerMessage::ResultsTranslated(translated));
        });
        Ok(())
    }

    /// Wait for the next worker message and apply it
    ///
    /// Events applied while a blocking helper waited for another task come
    /// first, in arrival order.
    ///
    /// # Returns
    /// * `Ok(None)` - Nothing is pending or in flight, so no message can arrive
    /// * `Ok(Some(event))` - The applied message, for display
    /// * `Err(AppError::Search)` - The search worker rejected the query
    pub async fn next_event(&mut self) -> Result<Option<ControllerEvent>, AppError> {
        if let Some(event) = self.pending.pop_front() {
            return event.map(Some);
        }
        if !self.search_in_flight && !self.translation_in_flight {
            return Ok(None);
        }

        let message = self.receiver.recv().await.ok_or(AppError::ChannelClosed)?;
        self.apply(message).map(Some)
    }

    /// Apply messages until `pick` accepts an event of `kind`
    ///
    /// Events of the other task kind are kept for `next_event`; non-final
    /// events of `kind` are dropped.
    async fn wait_for<T>(
        &mut self,
        kind: TaskKind,
        mut pick: impl FnMut(ControllerEvent) -> Option<T>,
    ) -> Result<T, AppError> {
        loop {
            let message = self.receiver.recv().await.ok_or(AppError::ChannelClosed)?;
            if message.kind() != kind {
                let applied = self.apply(message);
                debug!("Keeping event applied while waiting for {}: {:?}", kind.name(), applied);
                self.pending.push_back(applied);
                continue;
            }

            if let Some(value) = pick(self.apply(message)?) {
                return Ok(value);
            }
        }
    }

    fn apply(&mut self, message: WorkerMessage) -> Result<ControllerEvent, AppError> {
        match message {
            WorkerMessage::SearchFinished(result) => {
                self.search_in_flight = false;
                let results = Arc::new(result?);
                self.results = Some(Arc::clone(&results));
                Ok(ControllerEvent::SearchCompleted(results))
            }
            WorkerMessage::TextTranslated { original, translation } => {
                self.translation_in_flight = false;
                Ok(ControllerEvent::TextTranslated { original, translation })
            }
            WorkerMessage::TranslationProgress { completed, total } => {
                Ok(ControllerEvent::TranslationProgress { completed, total })
            }
            WorkerMessage::ResultsTranslated(translated) => {
                self.translation_in_flight = false;
                Ok(ControllerEvent::ResultsTranslated(translated))
            }
        }
    }

    /// Search and wait for the result set
    pub async fn search(&mut self, query: &str) -> Result<Arc<SearchResults>, AppError> {
        self.submit_search(query)?;
        self.wait_for(TaskKind::Search, |event| match event {
            ControllerEvent::SearchCompleted(results) => Some(results),
            _ => None,
        })
        .await
    }

    /// Translate one text and wait for it
    pub async fn translate(&mut self, text: &str) -> Result<String, AppError> {
        self.submit_translate(text)?;
        self.wait_for(TaskKind::Translation, |event| match event {
            ControllerEvent::TextTranslated { translation, .. } => Some(translation),
            _ => None,
        })
        .await
    }

    /// Translate the current result set and wait for all of it
    pub async fn translate_all(&mut self) -> Result<Vec<TranslatedMatch>, AppError> {
        self.submit_translate_all()?;
        self.wait_for(TaskKind::Translation, |event| match event {
            ControllerEvent::ResultsTranslated(translated) => Some(translated),
            _ => None,
        })
        .await
    }

    /// Select the active provider and persist the choice
    pub fn set_active_provider(&mut self, kind: Option<ProviderKind>) -> Result<()> {
        self.config.active_provider = kind;
        let endpoint = kind.and_then(|k| self.config.endpoint_for(k));
        self.translator.set_active_provider(kind, endpoint);
        self.persist()
    }

    /// Replace the credentials and persist them
    pub fn set_credentials(&mut self, credentials: TranslationCredentials) -> Result<()> {
        self.config.credentials = credentials.clone();
        self.translator.set_credentials(credentials);
        self.persist()
    }

    /// Probe a provider, with the given credentials or the stored ones
    pub async fn probe_provider(&self, kind: ProviderKind, credentials: Option<&TranslationCredentials>) -> ProbeOutcome {
        let credentials = credentials.unwrap_or(&self.config.credentials);
        TranslationService::probe_provider(kind, credentials, self.config.endpoint_for(kind)).await
    }

    fn begin(&mut self, kind: TaskKind) -> Result<(), AppError> {
        let flag = match kind {
            TaskKind::Search => &mut self.search_in_flight,
            TaskKind::Translation => &mut self.translation_in_flight,
        };
        if *flag {
            warn!("Rejecting {} request, one is already running", kind.name());
            return Err(AppError::Busy(kind.name()));
        }
        *flag = true;
        Ok(())
    }

    fn hand_off(sender: &mpsc::UnboundedSender<WorkerMessage>, message: WorkerMessage) {
        if sender.send(message).is_err() {
            debug!("Controller dropped before a worker finished");
        }
    }

    fn persist(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save(path),
            None => Ok(()),
        }
    }
}
