//! SQLite storage for texts, verses and the dictionary

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use vidya_lib::models::{Text, TextCategory, Verse, VerseSource};
use vidya_lib::source::{builtin_texts, demo_dictionary};
use vidya_lib::wire::{DictionaryRow, TextWithVerses};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS texts (
    id TEXT PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    chapters INTEGER NOT NULL DEFAULT 0,
    verses INTEGER NOT NULL DEFAULT 0,
    image_url TEXT
);

CREATE TABLE IF NOT EXISTS verses (
    id TEXT PRIMARY KEY,
    text_id TEXT NOT NULL REFERENCES texts(id),
    chapter INTEGER NOT NULL,
    verse INTEGER NOT NULL,
    sanskrit TEXT NOT NULL,
    transliteration TEXT,
    english_translation TEXT,
    hindi_translation TEXT,
    commentary TEXT,
    UNIQUE(text_id, chapter, verse)
);

CREATE TABLE IF NOT EXISTS dictionary (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    transliteration TEXT,
    meaning TEXT,
    definition TEXT,
    part_of_speech TEXT,
    etymology TEXT,
    grammar TEXT,
    usage_examples TEXT,  -- JSON array
    related_words TEXT    -- JSON array
);

CREATE INDEX IF NOT EXISTS idx_verses_text ON verses(text_id, chapter, verse);
CREATE INDEX IF NOT EXISTS idx_dictionary_word ON dictionary(word);
"#;

const TEXT_COLUMNS: &str = "id, slug, title, category, description, chapters, verses, image_url";
const VERSE_COLUMNS: &str = "v.id, v.text_id, v.chapter, v.verse, v.sanskrit, v.transliteration, \
                             v.english_translation, v.hindi_translation, v.commentary";

/// Handle on the content database. Each call opens its own connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

fn json_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok()).unwrap_or_default()
}

fn row_to_text(row: &Row) -> rusqlite::Result<Text> {
    Ok(Text {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        category: TextCategory::from(row.get::<_, String>(3)?),
        description: row.get(4)?,
        chapters: row.get(5)?,
        verses: row.get(6)?,
        image_url: row.get(7)?,
    })
}

fn row_to_verse(row: &Row) -> rusqlite::Result<Verse> {
    Ok(Verse {
        id: row.get(0)?,
        text_id: row.get(1)?,
        chapter: row.get(2)?,
        verse: row.get(3)?,
        sanskrit: row.get(4)?,
        transliteration: row.get(5)?,
        english_translation: row.get(6)?,
        hindi_translation: row.get(7)?,
        commentary: row.get(8)?,
        source: None,
    })
}

fn row_to_dictionary(row: &Row) -> rusqlite::Result<DictionaryRow> {
    Ok(DictionaryRow {
        id: row.get(0)?,
        word: row.get(1)?,
        transliteration: row.get(2)?,
        meaning: row.get(3)?,
        definition: row.get(4)?,
        part_of_speech: row.get(5)?,
        etymology: row.get(6)?,
        grammar: row.get(7)?,
        usage_examples: json_list(row.get(8)?),
        related_words: json_list(row.get(9)?),
    })
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Open a connection with `fold()` registered. SQLite's own `lower()`
    /// only folds ASCII, which misses IAST letters such as `Ā`.
    pub fn connection(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.create_scalar_function(
            "fold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        Ok(conn)
    }

    /// Create tables if missing
    pub fn init(&self) -> rusqlite::Result<()> {
        self.connection()?.execute_batch(SCHEMA)
    }

    /// Fill empty tables with the built-in catalog and demo dictionary.
    /// Returns the number of rows written.
    pub fn seed_defaults(&self) -> rusqlite::Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let mut written = 0;

        let texts: i64 = tx.query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))?;
        if texts == 0 {
            for text in builtin_texts() {
                insert_text(&tx, &text)?;
                written += 1;
            }
        }

        let words: i64 = tx.query_row("SELECT COUNT(*) FROM dictionary", [], |row| row.get(0))?;
        if words == 0 {
            for (key, entry) in demo_dictionary() {
                let examples: Vec<String> = entry.examples.into_iter().map(|e| e.native).collect();
                insert_dictionary(
                    &tx,
                    &DictionaryRow {
                        id: key,
                        word: entry.word,
                        transliteration: entry.transliteration,
                        meaning: Some(entry.meanings.join(", ")),
                        grammar: entry.grammar,
                        usage_examples: examples,
                        ..DictionaryRow::default()
                    },
                )?;
                written += 1;
            }
        }

        tx.commit()?;
        Ok(written)
    }

    pub fn count_texts(&self) -> rusqlite::Result<i64> {
        self.connection()?
            .query_row("SELECT COUNT(*) FROM texts", [], |row| row.get(0))
    }

    /// Case-insensitive substring match on word, transliteration or meaning,
    /// ordered by word
    pub fn search_dictionary(&self, query: &str, limit: usize) -> rusqlite::Result<Vec<DictionaryRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, word, transliteration, meaning, definition, part_of_speech, etymology,
                    grammar, usage_examples, related_words
             FROM dictionary
             WHERE instr(fold(word), fold(?1)) > 0
                OR instr(fold(coalesce(transliteration, '')), fold(?1)) > 0
                OR instr(fold(coalesce(meaning, '')), fold(?1)) > 0
             ORDER BY word
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![query, limit as i64], row_to_dictionary)?
            .collect();
        rows
    }

    pub fn list_texts(&self) -> rusqlite::Result<Vec<Text>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM texts ORDER BY title", TEXT_COLUMNS))?;
        let rows = stmt.query_map([], row_to_text)?.collect();
        rows
    }

    fn text_by_slug(conn: &Connection, slug: &str) -> rusqlite::Result<Option<Text>> {
        conn.query_row(
            &format!("SELECT {} FROM texts WHERE slug = ?1", TEXT_COLUMNS),
            [slug],
            row_to_text,
        )
        .optional()
    }

    /// A text with every verse in chapter/verse order
    pub fn text_with_verses(&self, slug: &str) -> rusqlite::Result<Option<TextWithVerses>> {
        let conn = self.connection()?;
        let Some(text) = Self::text_by_slug(&conn, slug)? else {
            return Ok(None);
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM verses v WHERE v.text_id = ?1 ORDER BY v.chapter, v.verse",
            VERSE_COLUMNS
        ))?;
        let verses = stmt
            .query_map([&text.id], row_to_verse)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(TextWithVerses { text, verses }))
    }

    /// One verse with its parent text's summary
    pub fn verse(&self, slug: &str, chapter: u32, verse: u32) -> rusqlite::Result<Option<Verse>> {
        let conn = self.connection()?;
        let Some(text) = Self::text_by_slug(&conn, slug)? else {
            return Ok(None);
        };
        let found = conn
            .query_row(
                &format!(
                    "SELECT {} FROM verses v WHERE v.text_id = ?1 AND v.chapter = ?2 AND v.verse = ?3",
                    VERSE_COLUMNS
                ),
                params![text.id, chapter, verse],
                row_to_verse,
            )
            .optional()?;
        Ok(found.map(|v| Verse {
            source: Some(VerseSource {
                title: text.title,
                slug: text.slug,
                category: text.category,
            }),
            ..v
        }))
    }

    pub fn insert_verse(&self, verse: &Verse) -> rusqlite::Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO verses (id, text_id, chapter, verse, sanskrit, transliteration,
                                 english_translation, hindi_translation, commentary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                verse.id,
                verse.text_id,
                verse.chapter,
                verse.verse,
                verse.sanskrit,
                verse.transliteration,
                verse.english_translation,
                verse.hindi_translation,
                verse.commentary,
            ],
        )?;
        Ok(())
    }
}

fn insert_text(conn: &Connection, text: &Text) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO texts (id, slug, title, category, description, chapters, verses, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            text.id,
            text.slug,
            text.title,
            text.category.label(),
            text.description,
            text.chapters,
            text.verses,
            text.image_url,
        ],
    )?;
    Ok(())
}

fn insert_dictionary(conn: &Connection, row: &DictionaryRow) -> rusqlite::Result<()> {
    let examples = serde_json::to_string(&row.usage_examples).unwrap_or_else(|_| "[]".to_string());
    let related = serde_json::to_string(&row.related_words).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "INSERT OR IGNORE INTO dictionary (id, word, transliteration, meaning, definition,
                                           part_of_speech, etymology, grammar, usage_examples,
                                           related_words)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.id,
            row.word,
            row.transliteration,
            row.meaning,
            row.definition,
            row.part_of_speech,
            row.etymology,
            row.grammar,
            examples,
            related,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("vidya.db"));
        db.init().unwrap();
        db.seed_defaults().unwrap();
        (dir, db)
    }

    #[test]
    fn seeding_fills_empty_tables_once() {
        let (_dir, db) = seeded();
        assert_eq!(db.count_texts().unwrap(), 24);
        assert_eq!(db.seed_defaults().unwrap(), 0);
    }

    #[test]
    fn grammar_notes_keep_their_own_column() {
        let (_dir, db) = seeded();
        let hit = db
            .search_dictionary("dharma", 10)
            .unwrap()
            .into_iter()
            .find(|row| row.id == "dharma")
            .unwrap();
        assert!(hit.definition.is_none());
        assert!(hit.grammar.unwrap().starts_with("Masculine noun"));
    }

    #[test]
    fn catalog_is_ordered_by_title() {
        let (_dir, db) = seeded();
        let texts = db.list_texts().unwrap();
        assert_eq!(texts.first().unwrap().title, "Arthashastra");
        let mut sorted: Vec<String> = texts.iter().map(|t| t.title.clone()).collect();
        sorted.sort();
        assert_eq!(sorted, texts.iter().map(|t| t.title.clone()).collect::<Vec<_>>());
        assert_eq!(texts[0].category, TextCategory::EconomicsPolitics);
    }

    #[test]
    fn dictionary_search_is_case_insensitive_and_limited() {
        let (_dir, db) = seeded();
        let hits = db.search_dictionary("KNOWLEDGE", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "vidya");
        assert_eq!(hits[0].usage_examples.len(), 2);

        assert_eq!(db.search_dictionary("a", 1).unwrap().len(), 1);
        assert_eq!(db.search_dictionary("VIDYĀ", 10).unwrap()[0].id, "vidya");
        assert!(db.search_dictionary("zzz", 10).unwrap().is_empty());
    }

    #[test]
    fn verses_come_back_in_order_with_parent() {
        let (_dir, db) = seeded();
        for (id, chapter, number) in [("v2", 2, 47), ("v1", 1, 1)] {
            db.insert_verse(&Verse {
                id: Some(id.to_string()),
                text_id: Some("bhagavad-gita".to_string()),
                chapter,
                verse: number,
                sanskrit: "धर्मक्षेत्रे".to_string(),
                transliteration: None,
                english_translation: None,
                hindi_translation: None,
                commentary: None,
                source: None,
            })
            .unwrap();
        }

        let text = db.text_with_verses("bhagavad-gita").unwrap().unwrap();
        let ids: Vec<_> = text.verses.iter().map(|v| v.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["v1", "v2"]);

        let verse = db.verse("bhagavad-gita", 2, 47).unwrap().unwrap();
        assert_eq!(verse.source.unwrap().title, "Bhagavad Gita");
        assert!(db.verse("bhagavad-gita", 3, 1).unwrap().is_none());
        assert!(db.text_with_verses("missing").unwrap().is_none());
    }
}
