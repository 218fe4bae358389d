//! Random request material for the load generator

use uuid::Uuid;

use crate::model::{Book, BookId, FormatEntry, Person};

/// Gutendex ids the read-by-id traffic draws from
pub const KNOWN_IDS: [u64; 32] = [
    26184, 84, 25558, 2701, 1513, 1342, 11, 100, 145, 37106, 2641, 64317, 2542, 16389, 67979, 174,
    394, 1080, 6761, 2160, 1952, 6593, 4085, 844, 5197, 1259, 43, 345, 2554, 5200, 76, 25344,
];

const TITLES: [&str; 5] = [
    "The Scarlet Letter",
    "Moby Dick",
    "1984",
    "Brave New World",
    "To Kill a Mockingbird",
];

/// Uniform-ish index below `bound` (bound > 0), seeded from a v4 UUID
fn random_below(bound: usize) -> usize {
    let (_, low) = Uuid::new_v4().as_u64_pair();
    (low % bound as u64) as usize
}

/// One of [`KNOWN_IDS`]
pub fn random_id() -> BookId {
    BookId::from(KNOWN_IDS[random_below(KNOWN_IDS.len())])
}

/// A fresh record with a unique-ish title and no id
pub fn random_book() -> Book {
    book_for(TITLES[random_below(TITLES.len())], random_below(10_000) as u32)
}

/// The generated record for a given title and serial number
pub fn book_for(title: &str, serial: u32) -> Book {
    let title = format!("{} Part {}", title, serial);
    let birth_year = 1900 + (serial % 100) as i32;

    Book {
        title: Some(title.clone()),
        authors: vec![Person {
            name: format!("Author {}", serial),
            birth_year: Some(birth_year),
            death_year: Some(birth_year + 70),
        }],
        summaries: vec![format!("A dynamically generated record titled \"{}\".", title)],
        subjects: vec!["Random Fiction".to_string(), "Example Subject".to_string()],
        bookshelves: vec!["Demo Shelf".to_string()],
        languages: vec!["en".to_string()],
        copyright: Some(false),
        media_type: Some("Text".to_string()),
        formats: vec![FormatEntry::new(
            "text/html",
            format!("https://example.com/book{}.html", serial),
        )]
        .into(),
        download_count: Some(serial as u64),
        ..Book::default()
    }
}
