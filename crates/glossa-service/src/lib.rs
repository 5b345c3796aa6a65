//! Inference service: lazily bootstrapped language detector and its HTTP surface.

mod error;
pub use error::{BootstrapError, DetectError};

pub mod bootstrap;
pub mod detector;
#[cfg(feature = "server")]
pub mod http;
pub mod source;

pub use bootstrap::{BootstrapConfig, Origin, load_or_train, train_from};
pub use detector::Detector;
pub use source::{CorpusSource, FileSource, MemorySource, source_for};

#[cfg(test)]
pub(crate) mod testing {
    use glossa_core::TrainingExample;

    /// English / French / Spanish / German sample corpus.
    pub fn corpus() -> Vec<TrainingExample> {
        [
            ("Hello, how are you? I am doing well today.", "English"),
            ("What are you doing today? The weather is nice.", "English"),
            ("Thank you very much, have a good day.", "English"),
            ("Bonjour, comment allez-vous aujourd'hui ?", "French"),
            ("Je vais bien, merci beaucoup. Et vous ?", "French"),
            ("Il fait très beau aujourd'hui à Paris.", "French"),
            ("Hola, ¿cómo estás hoy? Estoy muy bien.", "Spanish"),
            ("Muchas gracias por tu ayuda, amigo.", "Spanish"),
            ("Hoy hace buen tiempo en Madrid.", "Spanish"),
            ("Hallo, wie geht es dir heute?", "German"),
            ("Guten Tag, mir geht es gut, danke.", "German"),
            ("Das Wetter ist heute sehr schön in Berlin.", "German"),
        ]
        .into_iter()
        .map(|(t, l)| TrainingExample::new(t, l))
        .collect()
    }
}
