//! Sample Norse entries created at startup.
//!
//! Seeding only runs against an empty store, so restarting a server backed
//! by PostgreSQL never duplicates the samples.

use tracing::info;

use crate::domain::ports::{EntryRepository, EntryRepositoryError};
use crate::domain::{ActorId, Category, NewEntry};

struct SampleEntry {
    title: &'static str,
    category: Category,
    description: &'static str,
    related_terms: &'static [&'static str],
    sources: &'static str,
}

const SAMPLE_ENTRIES: [SampleEntry; 6] = [
    SampleEntry {
        title: "Odin",
        category: Category::Deity,
        description: "The All-Father and chief deity of the Norse pantheon, associated with \
                      wisdom, war, death, and poetry. Known for sacrificing his eye for \
                      knowledge and hanging from Yggdrasil for nine days and nights to \
                      discover the runes.",
        related_terms: &[
            "wisdom", "war", "ravens", "huginn", "muninn", "sleipnir", "gungnir", "valhalla",
            "asgard", "runes",
        ],
        sources: "Snorri Sturluson - Prose Edda; Poetic Edda - Various poems including \
                  Völuspá and Hávamál; Saxo Grammaticus - Gesta Danorum",
    },
    SampleEntry {
        title: "Valhalla",
        category: Category::Place,
        description: "The magnificent hall of the slain located in Asgard, ruled over by \
                      Odin. Warriors who die gloriously in battle are brought here by the \
                      Valkyries to feast and fight until Ragnarök.",
        related_terms: &[
            "afterlife", "warriors", "asgard", "odin", "valkyries", "einherjar", "ragnarok",
        ],
        sources: "Prose Edda; Poetic Edda - Grímnismál; Heimskringla",
    },
    SampleEntry {
        title: "Mjölnir",
        category: Category::Artifact,
        description: "Thor's mighty hammer, forged by the dwarven brothers Brokkr and Eitri. \
                      It never misses its target and always returns to Thor's hand after \
                      being thrown. Symbol of protection and divine power.",
        related_terms: &[
            "thor", "lightning", "protection", "dwarves", "brokkr", "eitri", "jotuns", "giants",
        ],
        sources: "Prose Edda - Skáldskaparmál; Poetic Edda - Þrymskviða; Archaeological \
                  evidence from Scandinavia",
    },
    SampleEntry {
        title: "Ragnarök",
        category: Category::Concept,
        description: "The prophesied end of the world in Norse mythology, involving a great \
                      battle between the gods and giants, leading to the death of major \
                      deities and the submersion of the world in water, followed by rebirth.",
        related_terms: &[
            "prophecy",
            "apocalypse",
            "rebirth",
            "fimbulwinter",
            "surtr",
            "fenrir",
            "jormungandr",
            "twilight-of-gods",
        ],
        sources: "Prose Edda - Gylfaginning; Poetic Edda - Völuspá",
    },
    SampleEntry {
        title: "Freya",
        category: Category::Deity,
        description: "Goddess of love, beauty, fertility, war, and death. Sister of Freyr and \
                      one of the most venerated deities in Norse mythology. Associated with \
                      seidr magic and the afterlife realm Fólkvangr.",
        related_terms: &[
            "love", "fertility", "seidr", "folkvangr", "freyr", "vanir", "beauty", "magic",
            "cats",
        ],
        sources: "Prose Edda; Poetic Edda; Heimskringla; Archaeological evidence from Sweden",
    },
    SampleEntry {
        title: "Yggdrasil",
        category: Category::Place,
        description: "The immense sacred tree that connects the nine worlds in Norse \
                      cosmology. An ash tree that stands at the center of the cosmos, with \
                      roots extending into various realms and wells.",
        related_terms: &[
            "cosmology",
            "sacred",
            "nine-worlds",
            "world-tree",
            "wells",
            "norns",
            "urd",
            "verdandi",
            "skuld",
        ],
        sources: "Prose Edda - Gylfaginning; Poetic Edda - Völuspá, Grímnismál",
    },
];

impl SampleEntry {
    fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            title: self.title.to_owned(),
            category: self.category,
            description: self.description.to_owned(),
            related_terms: Some(
                self.related_terms
                    .iter()
                    .map(|term| (*term).to_owned())
                    .collect(),
            ),
            sources: Some(self.sources.to_owned()),
        }
    }
}

/// Create the sample entries when the store is empty.
///
/// Returns the number of entries created; zero when the store already held
/// entries.
///
/// # Examples
///
/// ```rust
/// use mimir::outbound::persistence::MemoryStorage;
/// use mimir::seed::seed_sample_entries;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let storage = MemoryStorage::default();
/// assert_eq!(seed_sample_entries(&storage).await.expect("seed"), 6);
/// assert_eq!(seed_sample_entries(&storage).await.expect("reseed"), 0);
/// # }
/// ```
pub async fn seed_sample_entries(
    storage: &dyn EntryRepository,
) -> Result<usize, EntryRepositoryError> {
    let existing = storage.count_entries().await?;
    if existing > 0 {
        info!(reason = "not_empty", existing, "sample entry seeding skipped");
        return Ok(0);
    }

    let actor = ActorId::system();
    for sample in &SAMPLE_ENTRIES {
        storage.create_entry(sample.to_new_entry(), &actor).await?;
    }
    info!(created = SAMPLE_ENTRIES.len(), "sample entries seeded");
    Ok(SAMPLE_ENTRIES.len())
}
