//! Built-in catalog and demo dictionary, served without a backend

use super::DataSource;
use crate::error::VidyaError;
use crate::models::{DictionaryEntry, Text, TextCategory, UsageExample};

/// (slug, title, category, description, chapters, verses)
const BUILTIN_TEXTS: &[(&str, &str, &str, &str, u32, u32)] = &[
    ("bhagavad-gita", "Bhagavad Gita", "Philosophy", "The sacred dialogue between Krishna and Arjuna, offering guidance on ethics, duty and spiritual wisdom.", 18, 700),
    ("ramayana", "Ramayana", "Epic", "The epic tale of Prince Rama's journey, exemplifying duty, courage, and righteousness.", 7, 24000),
    ("mahabharata", "Mahabharata", "Epic", "One of the two major Sanskrit epics of ancient India, the other being the Ramayana.", 18, 100000),
    ("upanishads", "Upanishads", "Philosophy", "Philosophical texts exploring concepts of reality, consciousness, and the nature of existence.", 108, 10000),
    ("vedas", "Vedas", "Scripture", "The oldest scriptures of Hinduism, containing hymns, philosophy, and guidance.", 4, 20000),
    ("puranas", "Puranas", "Mythology", "Ancient texts that encompass mythology, legends, and other traditional lore.", 18, 400000),
    ("arthashastra", "Arthashastra", "Economics & Politics", "An ancient Indian treatise on statecraft, economic policy, and military strategy.", 15, 6000),
    ("manusmriti", "Manusmriti", "Law", "An ancient legal text and constitution among the many Dharmaśāstras of Hinduism.", 12, 2600),
    ("yoga-sutras", "Yoga Sutras of Patanjali", "Philosophy", "Foundational text of yoga philosophy, outlining the eight limbs of yoga practice.", 4, 196),
    ("brahma-sutras", "Brahma Sutras", "Philosophy", "Systematic philosophical treatise on the nature of Brahman and ultimate reality.", 4, 555),
    ("shiva-purana", "Shiva Purana", "Mythology", "Sacred text dedicated to Lord Shiva, containing stories, hymns, and philosophical teachings.", 7, 24000),
    ("vishnu-purana", "Vishnu Purana", "Mythology", "One of the eighteen major Puranas, focusing on Lord Vishnu and his avatars.", 6, 7000),
    ("devi-mahatmya", "Devi Mahatmya", "Scripture", "Sacred text celebrating the Divine Mother, also known as Chandi or Durga Saptashati.", 13, 700),
    ("katha-upanishad", "Katha Upanishad", "Philosophy", "Upanishad containing the dialogue between Nachiketa and Death, exploring life's deeper meanings.", 2, 119),
    ("mandukya-upanishad", "Mandukya Upanishad", "Philosophy", "Shortest of the major Upanishads, exploring the nature of consciousness and reality.", 1, 12),
    ("bhagavata-purana", "Bhagavata Purana", "Mythology", "One of the most popular Puranas, focusing on the life and teachings of Krishna.", 12, 18000),
    ("hanuman-chalisa", "Hanuman Chalisa", "Devotional", "Forty-verse hymn in praise of Lord Hanuman, composed by Tulsidas.", 1, 40),
    ("sundara-kanda", "Sundara Kanda", "Epic", "Fifth book of the Ramayana, focusing on Hanuman's journey to Lanka.", 1, 2885),
    ("gayatri-mantra", "Gayatri Mantra", "Scripture", "Most sacred mantra in Hinduism, invoking the divine light of universal consciousness.", 1, 1),
    ("ishavasyopanishad", "Isha Upanishad", "Philosophy", "Opening Upanishad of the Shukla Yajurveda, exploring the unity of existence.", 1, 18),
    ("ashtavakra-gita", "Ashtavakra Gita", "Philosophy", "Dialogue between sage Ashtavakra and King Janaka on the nature of self and reality.", 20, 298),
    ("bhaja-govindam", "Bhaja Govindam", "Devotional", "Composition by Adi Shankaracharya emphasizing devotion over mere intellectual learning.", 1, 31),
    ("viveka-chudamani", "Viveka Chudamani", "Philosophy", "Major work by Adi Shankaracharya on the discrimination between the real and unreal.", 1, 580),
    ("panchadashi", "Panchadashi", "Philosophy", "Advaita Vedanta text by Vidyaranya, explaining the nature of consciousness and reality.", 15, 1500),
];

pub fn builtin_texts() -> Vec<Text> {
    BUILTIN_TEXTS
        .iter()
        .map(|&(slug, title, category, description, chapters, verses)| Text {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            category: TextCategory::from(category),
            description: description.to_string(),
            chapters,
            verses,
            image_url: None,
        })
        .collect()
}

fn example(native: &str, transliteration: &str, gloss: &str) -> UsageExample {
    UsageExample {
        native: native.to_string(),
        transliteration: Some(transliteration.to_string()),
        gloss: Some(gloss.to_string()),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The three-word demo dictionary, keyed by plain-ASCII lookup key
pub fn demo_dictionary() -> Vec<(String, DictionaryEntry)> {
    vec![
        (
            "dharma".to_string(),
            DictionaryEntry {
                word: "धर्म".to_string(),
                transliteration: Some("dharma".to_string()),
                meanings: strings(&[
                    "Righteous conduct",
                    "Moral law",
                    "Virtue",
                    "Religious duty",
                    "The natural order of things",
                ]),
                examples: vec![
                    example("धर्मो रक्षति रक्षितः", "dharmo rakṣati rakṣitaḥ", "Dharma protects those who protect it"),
                    example("यतो धर्मस्ततो जयः", "yato dharmas tato jayaḥ", "Where there is dharma, there is victory"),
                ],
                grammar: Some("Masculine noun, Nominative singular: धर्मः (dharmaḥ)".to_string()),
                ..DictionaryEntry::default()
            },
        ),
        (
            "vidya".to_string(),
            DictionaryEntry {
                word: "विद्या".to_string(),
                transliteration: Some("vidyā".to_string()),
                meanings: strings(&["Knowledge", "Learning", "Science", "Scholarship", "Philosophy"]),
                examples: vec![
                    example("विद्या ददाति विनयम्", "vidyā dadāti vinayam", "Knowledge gives humility"),
                    example("सा विद्या या विमुक्तये", "sā vidyā yā vimuktaye", "That is knowledge which liberates"),
                ],
                grammar: Some("Feminine noun, Nominative singular: विद्या (vidyā)".to_string()),
                ..DictionaryEntry::default()
            },
        ),
        (
            "namaste".to_string(),
            DictionaryEntry {
                word: "नमस्ते".to_string(),
                transliteration: Some("namaste".to_string()),
                meanings: strings(&["I bow to you", "Greetings", "Salutations", "Reverence to you"]),
                examples: vec![example("नमस्ते गुरुदेव", "namaste gurudeva", "Salutations to you, teacher")],
                grammar: Some("From नमः (namaḥ, salutation) + ते (te, to you)".to_string()),
                ..DictionaryEntry::default()
            },
        ),
    ]
}

/// What a dictionary search returns when nothing matches
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    #[default]
    Empty,
    /// Return the entry stored under this key as a suggestion
    Suggest(String),
}

/// Serves a fixed catalog and dictionary from memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    texts: Vec<Text>,
    keys: Vec<String>,
    dictionary: Vec<DictionaryEntry>,
    no_match: NoMatchPolicy,
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticSource {
    /// Built-in catalog and demo dictionary; no suggestion on a miss
    pub fn new() -> Self {
        let (keys, dictionary) = demo_dictionary().into_iter().unzip();
        Self {
            texts: builtin_texts(),
            keys,
            dictionary,
            no_match: NoMatchPolicy::Empty,
        }
    }

    /// Demo dictionary: a search with no hits suggests "dharma".
    pub fn demo() -> Self {
        Self::new().with_no_match(NoMatchPolicy::Suggest("dharma".to_string()))
    }

    pub fn with_texts(mut self, texts: Vec<Text>) -> Self {
        self.texts = texts;
        self
    }

    pub fn with_no_match(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    pub fn dictionary(&self) -> &[DictionaryEntry] {
        &self.dictionary
    }

    fn entry_for_key(&self, key: &str) -> Option<&DictionaryEntry> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| &self.dictionary[i])
    }

    /// Exact key first, then substring over transliteration, headword and
    /// meanings, then the no-match policy.
    pub fn lookup(&self, query: &str, limit: usize) -> Vec<DictionaryEntry> {
        let query = query.trim();
        let lower = query.to_lowercase();

        if let Some(entry) = self.entry_for_key(&lower) {
            return vec![entry.clone()];
        }

        let mut results: Vec<DictionaryEntry> = self
            .dictionary
            .iter()
            .filter(|entry| {
                entry
                    .transliteration
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&lower))
                    || entry.word.contains(query)
                    || entry.meanings.iter().any(|m| m.to_lowercase().contains(&lower))
            })
            .take(limit)
            .cloned()
            .collect();

        if results.is_empty() {
            if let NoMatchPolicy::Suggest(key) = &self.no_match {
                results.extend(self.entry_for_key(key).cloned());
            }
        }
        results
    }
}

impl DataSource for StaticSource {
    async fn fetch_catalog(&self) -> Result<Vec<Text>, VidyaError> {
        Ok(self.texts.clone())
    }

    async fn search_dictionary(&self, query: &str, limit: usize) -> Result<Vec<DictionaryEntry>, VidyaError> {
        Ok(self.lookup(query, limit))
    }
}
