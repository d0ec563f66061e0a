mod common;

use chrono::NaiveDate;
use common::{import_json, names, setup_test_db};
use pd_cards::{CardsError, Database, JaroWinklerMatcher, NameMatcher, SearchOptions};
use pd_find::SearchError;

#[tokio::test]
async fn test_contains_colors() {
    let db = setup_test_db().await;
    let found = names(&db, "c:rg").await;
    assert_eq!(found, vec!["Animar, Soul of Elements", "Naya Charm"]);
    assert!(!found.contains(&"Cinder Glade".to_string()));
}

#[tokio::test]
async fn test_exact_colors_exclude_extra_colors() {
    let db = setup_test_db().await;
    assert_eq!(names(&db, "c=rg").await, vec!["Animar, Soul of Elements"]);
    assert_eq!(names(&db, "c!rg").await, vec!["Animar, Soul of Elements"]);
}

#[tokio::test]
async fn test_colorless_and_multicolor() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "c:c").await,
        vec!["Akoum Refuge", "Canyon Slough", "Cinder Glade", "Sol Ring"]
    );
    assert_eq!(names(&db, "ci:c").await, vec!["Sol Ring"]);
    assert_eq!(
        names(&db, "c:m").await,
        vec!["Animar, Soul of Elements", "Naya Charm", "Sphinx of the Steel Wind"]
    );
}

#[tokio::test]
async fn test_identity_subset_and_superset() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "ci<=esper").await,
        vec![
            "Counterspell",
            "Glorious Anthem",
            "Jace, the Mind Sculptor",
            "Serra Angel",
            "Sol Ring",
            "Sphinx of the Steel Wind",
            "Wrath of God",
        ]
    );
    assert_eq!(
        names(&db, "ci>=b").await,
        vec!["Akoum Refuge", "Canyon Slough", "Sphinx of the Steel Wind"]
    );
}

#[tokio::test]
async fn test_exact_mana_cost() {
    let db = setup_test_db().await;
    assert_eq!(names(&db, "mana=2WW").await, vec!["Wrath of God"]);
    assert_eq!(
        names(&db, "m:WW").await,
        vec!["Glorious Anthem", "Serra Angel", "Wrath of God"]
    );
}

#[tokio::test]
async fn test_negated_numeric_includes_null() {
    let db = setup_test_db().await;
    let found = names(&db, "-cmc=2").await;
    for land in ["Akoum Refuge", "Canyon Slough", "Cinder Glade"] {
        assert!(found.contains(&land.to_string()), "{} missing", land);
    }
    for two in ["Animar, Soul of Elements", "Counterspell", "Tarmogoyf"] {
        assert!(!found.contains(&two.to_string()), "{} present", two);
    }
    assert_eq!(found.len(), 12);
}

#[tokio::test]
async fn test_numeric_comparisons() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "pow=tou").await,
        vec![
            "Animar, Soul of Elements",
            "Llanowar Elves",
            "Serra Angel",
            "Sphinx of the Steel Wind"
        ]
    );
    assert_eq!(names(&db, "loy=3").await, vec!["Jace, the Mind Sculptor"]);
    assert!(names(&db, "pow>=0 tarmogoyf").await.is_empty());
}

#[tokio::test]
async fn test_oracle_ignores_reminder_text() {
    let db = setup_test_db().await;
    assert_eq!(names(&db, "o:cycling").await, vec!["Canyon Slough"]);
    assert!(names(&db, "o:discard").await.is_empty());
    assert_eq!(names(&db, "fo:discard").await, vec!["Canyon Slough"]);
    assert!(names(&db, "o:\"doesn't cause\"").await.is_empty());
    assert_eq!(names(&db, "fo:\"doesn't cause\"").await, vec!["Serra Angel"]);
}

#[tokio::test]
async fn test_tilde_matches_own_name() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "fo:/~ enters/").await,
        vec!["Akoum Refuge", "Canyon Slough", "Cinder Glade"]
    );
    assert_eq!(
        names(&db, "o:\"~ deals\"").await,
        vec!["Lightning Bolt", "Naya Charm"]
    );
}

#[tokio::test]
async fn test_tilde_with_pattern_characters_in_name() {
    let db = setup_test_db().await;
    import_json(
        &db,
        r#"[
            {"name": "+2 Mace", "type_line": "Artifact - Equipment",
             "oracle_text": "When +2 Mace enters, you gain 2 life."},
            {"name": "_____", "type_line": "Creature - Shapeshifter",
             "oracle_text": "Shock deals 2 damage to any target."}
        ]"#,
    )
    .await
    .unwrap();

    assert_eq!(
        names(&db, "fo:/~ enters/").await,
        vec!["+2 Mace", "Akoum Refuge", "Canyon Slough", "Cinder Glade"]
    );
    assert_eq!(
        names(&db, "o:\"~ deals\"").await,
        vec!["Lightning Bolt", "Naya Charm"]
    );
}

#[tokio::test]
async fn test_name_search_ignores_accents() {
    let db = setup_test_db().await;
    import_json(
        &db,
        r#"[
            {"name": "Lim-Dûl's Vault", "mana_cost": "{U}{B}", "cmc": 2,
             "type_line": "Instant"},
            {"name": "Æther Vial", "mana_cost": "{1}", "cmc": 1, "type_line": "Artifact"}
        ]"#,
    )
    .await
    .unwrap();

    assert_eq!(names(&db, "lim-dul").await, vec!["Lim-Dûl's Vault"]);
    assert_eq!(names(&db, "name:\"lim-dûl\"").await, vec!["Lim-Dûl's Vault"]);
    assert_eq!(
        names(&db, "name!\"lim-dul's vault\"").await,
        vec!["Lim-Dûl's Vault"]
    );
    assert_eq!(names(&db, "aether").await, vec!["Æther Vial"]);
}

#[tokio::test]
async fn test_regex_shorthand() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, r"fo:/\{T\}: Add \sc or \sc/").await,
        vec!["Akoum Refuge", "Canyon Slough", "Cinder Glade"]
    );
}

#[tokio::test]
async fn test_type_line() {
    let db = setup_test_db().await;
    assert_eq!(names(&db, "t:land -t:mountain").await, vec!["Akoum Refuge"]);
    assert_eq!(
        names(&db, "t:creature t:legendary").await,
        vec!["Animar, Soul of Elements"]
    );
}

#[tokio::test]
async fn test_land_shortcuts() {
    let db = setup_test_db().await;
    assert_eq!(names(&db, "is:bikeland").await, vec!["Canyon Slough"]);
    assert_eq!(names(&db, "is:cycleland").await, vec!["Canyon Slough"]);
    assert_eq!(names(&db, "is:gainland").await, vec!["Akoum Refuge"]);
    assert_eq!(names(&db, "is:refuge").await, vec!["Akoum Refuge"]);
}

#[tokio::test]
async fn test_format_legality() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "f:pd").await,
        vec![
            "Akoum Refuge",
            "Animar, Soul of Elements",
            "Cinder Glade",
            "Naya Charm",
            "Serra Angel",
            "Sphinx of the Steel Wind",
        ]
    );
    assert_eq!(names(&db, "f:pdblb").await, vec!["Canyon Slough"]);
    assert_eq!(names(&db, "f:pdall t:land").await.len(), 3);

    // Banned cards are not legal.
    let modern = names(&db, "f:modern").await;
    assert!(!modern.contains(&"Wrath of God".to_string()));
    assert!(modern.contains(&"Tarmogoyf".to_string()));
}

#[tokio::test]
async fn test_printings() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "r:mythic").await,
        vec![
            "Animar, Soul of Elements",
            "Jace, the Mind Sculptor",
            "Sphinx of the Steel Wind"
        ]
    );
    assert_eq!(
        names(&db, "e:arb").await,
        vec!["Animar, Soul of Elements", "Sphinx of the Steel Wind"]
    );
    assert_eq!(
        names(&db, "e:alara").await,
        vec![
            "Animar, Soul of Elements",
            "Naya Charm",
            "Sphinx of the Steel Wind"
        ]
    );
}

#[tokio::test]
async fn test_or_and_name_search() {
    let db = setup_test_db().await;
    assert_eq!(
        names(&db, "bolt OR ring").await,
        vec!["Lightning Bolt", "Sol Ring"]
    );
    assert_eq!(names(&db, "\"Sol Ring\"").await, vec!["Sol Ring"]);
}

#[tokio::test]
async fn test_record_fields() {
    let db = setup_test_db().await;
    let results = db
        .search("naya OR tarmogoyf", SearchOptions::default())
        .await
        .unwrap();
    let charm = &results.cards[0];
    assert_eq!(charm.name, "Naya Charm");
    assert_eq!(charm.colors, "WRG");
    assert_eq!(charm.cmc, Some(3.0));

    let goyf = &results.cards[1];
    assert_eq!(goyf.name, "Tarmogoyf");
    assert_eq!(goyf.power, None);
    assert_eq!(goyf.toughness, None);
    assert_eq!(goyf.color_identity, "G");
}

#[tokio::test]
async fn test_warnings_returned() {
    let db = setup_test_db().await;
    let results = db
        .search("t:land order:cmc", SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(results.cards.len(), 3);
    assert_eq!(
        results.warnings,
        vec!["Ignored unsupported Scryfall syntax 'order:cmc'".to_string()]
    );
}

#[tokio::test]
async fn test_pagination() {
    let db = setup_test_db().await;
    let page = db
        .search("t:instant", SearchOptions { limit: 1, offset: 1 })
        .await
        .unwrap();
    let found: Vec<String> = page.cards.into_iter().map(|c| c.name).collect();
    assert_eq!(found, vec!["Lightning Bolt"]);
}

#[tokio::test]
async fn test_bad_arguments() {
    let db = setup_test_db().await;
    for options in [
        SearchOptions { limit: 0, offset: 0 },
        SearchOptions { limit: 1001, offset: 0 },
        SearchOptions { limit: 10, offset: -1 },
    ] {
        assert!(
            matches!(
                db.search("t:land", options).await,
                Err(CardsError::Search(SearchError::InvalidArgument(_)))
            ),
            "{:?}",
            options
        );
    }
}

#[tokio::test]
async fn test_query_errors_surface() {
    let db = setup_test_db().await;
    assert!(matches!(
        db.search("fo:/unclosed", SearchOptions::default()).await,
        Err(CardsError::Search(SearchError::Syntax(_)))
    ));
    assert!(matches!(
        db.search("or GG", SearchOptions::default()).await,
        Err(CardsError::Search(SearchError::InvalidSearch(_)))
    ));
    assert!(matches!(
        db.search("f:pds999", SearchOptions::default()).await,
        Err(CardsError::Search(SearchError::InvalidValue(_)))
    ));
}

#[tokio::test]
async fn test_import_is_idempotent() {
    let db = setup_test_db().await;
    common::load_fixtures(&db).await;
    assert_eq!(db.card_names().await.unwrap().len(), 15);
    assert_eq!(names(&db, "e:arb").await.len(), 2);
}

#[tokio::test]
async fn test_import_normalizes_legalities() {
    let db = setup_test_db().await;
    import_json(
        &db,
        r#"[{"name": "Black Lotus", "mana_cost": "{0}", "cmc": 0, "type_line": "Artifact",
             "legalities": {"Vintage": "restricted", "Legacy": "banned",
                            "Modern": "not_legal", "Commander": "BANNED"}}]"#,
    )
    .await
    .unwrap();

    assert!(names(&db, "f:vintage").await.contains(&"Black Lotus".to_string()));
    for format in ["legacy", "modern", "commander"] {
        let found = names(&db, &format!("f:{}", format)).await;
        assert!(!found.contains(&"Black Lotus".to_string()), "legal in {}", format);
    }

    let err = import_json(
        &db,
        r#"[{"name": "Black Lotus", "legalities": {"Vintage": "suspended"}}]"#,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("suspended"));
    assert!(names(&db, "f:vintage").await.contains(&"Black Lotus".to_string()));
}

#[tokio::test]
async fn test_add_season_rotates_formats() {
    let db = setup_test_db().await;
    let before = names(&db, "f:pd").await;

    let start = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
    let season = db.add_season("fdn", start).await.unwrap();
    assert_eq!(season.number, 36);
    assert_eq!(season.code, "FDN");

    let catalog = db.catalog();
    assert_eq!(catalog.current_season(), 36);
    assert_eq!(catalog.format_id("Penny Dreadful DSK"), Some(1));
    assert!(catalog.format_id("Penny Dreadful").is_some());

    // Last season's legality moved to the archived format; the new season starts empty.
    assert!(names(&db, "f:pd").await.is_empty());
    assert_eq!(names(&db, "f:pddsk").await, before);
    assert_eq!(db.seasons().await.unwrap().len(), 36);
}

#[tokio::test]
async fn test_add_season_rejects_bad_input() {
    let db = setup_test_db().await;
    let start = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
    assert!(db.add_season("DSK", start).await.is_err());
    assert!(db
        .add_season("FDN", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        .await
        .is_err());
    assert!(db.add_season("F-N", start).await.is_err());
    assert_eq!(db.catalog().current_season(), 35);
}

#[tokio::test]
async fn test_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("cards.db").display());

    {
        let db = Database::new(&url).await.unwrap();
        common::load_fixtures(&db).await;
        let start = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        db.add_season("FDN", start).await.unwrap();
        db.pool().close().await;
    }

    let db = Database::new(&url).await.unwrap();
    let catalog = db.refresh_catalog().await.unwrap();
    assert_eq!(catalog.current_season(), 36);
    assert_eq!(catalog.season_code(36), Some("FDN"));
    assert_eq!(names(&db, "f:pddsk t:land").await, vec!["Akoum Refuge", "Cinder Glade"]);
}

#[tokio::test]
async fn test_did_you_mean() {
    let db = setup_test_db().await;
    assert!(names(&db, "Tarmogoyff").await.is_empty());

    let matcher = JaroWinklerMatcher::new(db.card_names().await.unwrap());
    let result = matcher.fuzzy_lookup("Tarmogoyff");
    assert_eq!(result.candidates().first().map(String::as_str), Some("Tarmogoyf"));
    assert_eq!(
        matcher.fuzzy_lookup("lightning").prefix_matches,
        vec!["Lightning Bolt"]
    );
}
