//! Shared fixtures for integration tests.
//!
//! Every fixture is a real SQLite file in a temporary directory, created and
//! seeded through a plain `rusqlite` connection before the pool opens it.

#![allow(dead_code)]

use std::path::PathBuf;

use compsearch::CompSearch;
use compsearch::config::CompSearchConfig;
use compsearch::query::model::{Champion, ChampionCost, ChampionTrait, Composition, CompositionChampion, Entity};
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub const SCHEMA: &str = "
    CREATE TABLE champions (
        id      INTEGER PRIMARY KEY,
        cost    INTEGER NOT NULL,
        name    TEXT    NOT NULL,
        range   INTEGER NOT NULL,
        uses_ap BOOLEAN NOT NULL
    );
    CREATE TABLE traits (
        id   INTEGER PRIMARY KEY,
        name TEXT    NOT NULL
    );
    CREATE TABLE trait_thresholds (
        id        INTEGER PRIMARY KEY,
        id_trait  INTEGER NOT NULL,
        threshold INTEGER NOT NULL,
        FOREIGN KEY (id_trait) REFERENCES traits(id),
        UNIQUE (id_trait, threshold)
    );
    CREATE TABLE champion_traits (
        id_champion INTEGER NOT NULL,
        id_trait    INTEGER NOT NULL,
        FOREIGN KEY (id_champion) REFERENCES champions(id),
        FOREIGN KEY (id_trait) REFERENCES traits(id),
        PRIMARY KEY (id_champion, id_trait)
    );
    CREATE TABLE compositions (
        id          INTEGER PRIMARY KEY,
        hash        TEXT    NOT NULL UNIQUE,
        is_expanded BOOLEAN NOT NULL DEFAULT 0,
        size        INTEGER NOT NULL
    );
    CREATE TABLE composition_champions (
        id_composition INTEGER NOT NULL,
        id_champion    INTEGER NOT NULL,
        FOREIGN KEY (id_composition) REFERENCES compositions(id),
        FOREIGN KEY (id_champion) REFERENCES champions(id),
        PRIMARY KEY (id_champion, id_composition)
    );
    CREATE TABLE scores_by_trait (
        id_composition INTEGER NOT NULL PRIMARY KEY,
        score          REAL    NOT NULL,
        FOREIGN KEY (id_composition) REFERENCES compositions(id)
    );
";

/// A seeded database file that lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// An empty file with no tables.
    pub fn bare() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("comps.db");
        Connection::open(&path).expect("create database");
        Self { _dir: dir, path }
    }

    /// An empty file with the composition schema.
    pub fn empty() -> Self {
        let fixture = Self::bare();
        fixture.conn().execute_batch(SCHEMA).expect("create schema");
        fixture
    }

    /// The standard dataset.
    ///
    /// | id | cost | range       | damage | traits |
    /// |----|------|-------------|--------|--------|
    /// | 1  | 1    | melee       | ad     | 1      |
    /// | 2  | 2    | ranged      | ap     | 2      |
    /// | 3  | 3    | semi-ranged | ad     | 1, 2   |
    /// | 4  | 4    | melee       | ap     | 3      |
    /// | 5  | 5    | ranged      | ad     | 2, 3   |
    ///
    /// Compositions: 100 {1,2}, 101 {2,5}, 102 {1,3,4}, 103 {2,3,5},
    /// 104 {4,5}, 105 {3}.
    pub fn standard() -> Self {
        let fixture = Self::empty();
        let conn = fixture.conn();

        for (id, name) in [(1, "Bruiser"), (2, "Sorcerer"), (3, "Duelist")] {
            conn.execute("INSERT INTO traits (id, name) VALUES (?1, ?2)", params![id, name])
                .expect("insert trait");
        }

        let champions = [
            (champion(1, 1, "Aatrox", 1, false), &[1][..]),
            (champion(2, 2, "Brand", 4, true), &[2][..]),
            (champion(3, 3, "Camille", 2, false), &[1, 2][..]),
            (champion(4, 4, "Diana", 1, true), &[3][..]),
            (champion(5, 5, "Ezreal", 4, false), &[2, 3][..]),
        ];
        for (champion, traits) in &champions {
            insert_champion(&conn, champion, traits);
        }

        insert_composition(&conn, 100, &[1, 2]);
        insert_composition(&conn, 101, &[2, 5]);
        insert_composition(&conn, 102, &[1, 3, 4]);
        insert_composition(&conn, 103, &[2, 3, 5]);
        insert_composition(&conn, 104, &[4, 5]);
        insert_composition(&conn, 105, &[3]);

        fixture
    }

    /// A writable connection for seeding.
    pub fn conn(&self) -> Connection {
        Connection::open(&self.path).expect("open database")
    }

    /// Client configuration pointing at this file.
    pub fn config(&self) -> CompSearchConfig {
        let toml = format!("[database]\nurl = \"sqlite://{}\"\n", self.path.display());
        CompSearchConfig::from_str(&toml).expect("config")
    }

    /// A connected client.
    pub async fn client(&self) -> CompSearch {
        CompSearch::connect(self.config()).await.expect("connect")
    }
}

pub fn champion(id: i64, cost: u8, name: &str, range: i64, uses_ap: bool) -> Champion {
    Champion {
        id,
        cost: ChampionCost::new(cost).expect("cost"),
        name: name.to_string(),
        range,
        uses_ap,
    }
}

pub fn insert_champion(conn: &Connection, champion: &Champion, traits: &[i64]) {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, cost, name, range, uses_ap) VALUES (?1, ?2, ?3, ?4, ?5)",
            Champion::TABLE
        ),
        params![champion.id, champion.cost.get(), champion.name, champion.range, champion.uses_ap],
    )
    .expect("insert champion");

    for id_trait in traits {
        let link = ChampionTrait {
            id_champion: champion.id,
            id_trait: *id_trait,
        };
        conn.execute(
            &format!("INSERT INTO {} (id_champion, id_trait) VALUES (?1, ?2)", ChampionTrait::TABLE),
            params![link.id_champion, link.id_trait],
        )
        .expect("insert champion trait");
    }
}

pub fn insert_composition(conn: &Connection, id: i64, members: &[i64]) {
    let composition = Composition {
        id,
        hash: format!("comp-{}", id),
        is_expanded: false,
        size: members.len() as i64,
    };
    conn.execute(
        &format!("INSERT INTO {} (id, hash, is_expanded, size) VALUES (?1, ?2, ?3, ?4)", Composition::TABLE),
        params![composition.id, composition.hash, composition.is_expanded, composition.size],
    )
    .expect("insert composition");

    for id_champion in members {
        let member = CompositionChampion {
            id_composition: id,
            id_champion: *id_champion,
        };
        conn.execute(
            &format!(
                "INSERT INTO {} (id_composition, id_champion) VALUES (?1, ?2)",
                CompositionChampion::TABLE
            ),
            params![member.id_composition, member.id_champion],
        )
        .expect("insert composition member");
    }
}

/// Ids of the returned compositions, in returned order.
pub fn ids(results: &[compsearch::CompositionSearchResult]) -> Vec<i64> {
    results.iter().map(|r| r.id).collect()
}

/// Members of a result, sorted.
pub fn sorted_members(result: &compsearch::CompositionSearchResult) -> Vec<i64> {
    let mut members = result.id_champions.clone();
    members.sort_unstable();
    members
}
