//! A compact library for tests and examples.
//!
//! Real deployments feed [`TitleIndex`](crate::TitleIndex) from the
//! table-of-contents API; the fixture set here is just large enough to
//! exercise every addressing scheme and category the engine handles.

use crate::title::{Addressing, BookRecord, TitleIndex};

/// A small, representative set of works: Tanakh books (one of them with a
/// multi-word title), a Talmudic tractate with folio addressing, and a
/// depth-3 commentary.
pub fn sample_index() -> TitleIndex {
    TitleIndex::from_records([
        {
            let mut genesis = BookRecord::new("Genesis", &["Chapter", "Verse"]);
            genesis.alt_titles = vec!["Bereshit".into()];
            genesis.primary_category = "Tanakh".into();
            genesis.corpus = Some("Tanakh".into());
            genesis
        },
        {
            let mut exodus = BookRecord::new("Exodus", &["Chapter", "Verse"]);
            exodus.primary_category = "Tanakh".into();
            exodus.corpus = Some("Tanakh".into());
            exodus
        },
        {
            let mut job = BookRecord::new("Job", &["Chapter", "Verse"]);
            job.primary_category = "Tanakh".into();
            job.corpus = Some("Tanakh".into());
            job
        },
        {
            let mut songs = BookRecord::new("Song of Songs", &["Chapter", "Verse"]);
            songs.primary_category = "Tanakh".into();
            songs.corpus = Some("Tanakh".into());
            songs
        },
        {
            let mut shabbat = BookRecord::new("Shabbat", &["Daf", "Line"]);
            shabbat.primary_category = "Talmud".into();
            shabbat.corpus = Some("Bavli".into());
            shabbat.addressing = Addressing::Folio;
            shabbat
        },
        {
            let mut rashi = BookRecord::new("Rashi on Genesis", &["Chapter", "Verse", "Comment"]);
            rashi.primary_category = "Commentary".into();
            rashi.collective_title = Some("Rashi".into());
            rashi
        },
        {
            let mut ibn_ezra = BookRecord::new("Ibn Ezra on Genesis", &["Chapter", "Verse", "Comment"]);
            ibn_ezra.primary_category = "Commentary".into();
            ibn_ezra.collective_title = Some("Ibn Ezra".into());
            ibn_ezra
        },
        {
            let mut onkelos = BookRecord::new("Onkelos Genesis", &["Chapter", "Verse"]);
            onkelos.primary_category = "Targum".into();
            onkelos.collective_title = Some("Onkelos".into());
            onkelos
        },
    ])
}
