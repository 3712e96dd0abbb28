//! Demo data seeding.
//!
//! Populates an empty store with a realistic set of facilities and
//! upcoming events so a fresh install has something to search and
//! recommend. Seeding never touches a non-empty facility table.

use chrono::{Duration, Utc};

use crate::db::Database;
use crate::error::Result;
use crate::models::{NewFacility, NewSportEvent};

/// Seed demo facilities and events when the store is empty. Returns true
/// when anything was inserted.
pub async fn seed_if_empty(db: &Database) -> Result<bool> {
    if db.count_facilities().await? > 0 {
        tracing::debug!("facilities already present, skipping seed");
        return Ok(false);
    }

    for facility in demo_facilities() {
        db.insert_facility(&facility).await?;
    }
    for event in demo_events() {
        db.insert_event(&event).await?;
    }

    tracing::info!(
        facilities = db.count_facilities().await?,
        events = db.count_events().await?,
        "seeded demo data"
    );
    Ok(true)
}

fn demo_facilities() -> Vec<NewFacility> {
    vec![
        NewFacility {
            name: "Спортивный комплекс 'Олимп'".to_string(),
            category: "спортивный комплекс".to_string(),
            address: "ул. Спортивная, 15".to_string(),
            sports: tags(&["Плавание", "Футбол", "Баскетбол"]),
            age_groups: tags(&["Дети (до 12)", "Подростки (13-17)", "Взрослые (18+)"]),
            contacts: Some("+7 (3462) 123-456".to_string()),
            description: Some(
                "Крупнейший спортивный комплекс в центре города с бассейном и залами".to_string(),
            ),
        },
        NewFacility {
            name: "Ледовый дворец 'Айсберг'".to_string(),
            category: "ледовая арена".to_string(),
            address: "пр. Ленина, 44".to_string(),
            sports: tags(&["Хоккей", "Фигурное катание"]),
            age_groups: tags(&["Дети (до 12)", "Подростки (13-17)", "Все возрасты"]),
            contacts: Some("+7 (3462) 222-333".to_string()),
            description: Some("Крытая ледовая арена с прокатом коньков и секциями".to_string()),
        },
        NewFacility {
            name: "Бассейн 'Дельфин'".to_string(),
            category: "бассейн".to_string(),
            address: "ул. Набережная, 3".to_string(),
            sports: tags(&["Плавание", "Аквааэробика"]),
            age_groups: tags(&["Дети (до 12)", "Взрослые (18+)", "Все возрасты"]),
            contacts: Some("+7 (3462) 777-888".to_string()),
            description: Some("25-метровый бассейн с детской чашей и сауной".to_string()),
        },
        NewFacility {
            name: "Стадион 'Юность'".to_string(),
            category: "стадион".to_string(),
            address: "ул. Мира, 21".to_string(),
            sports: tags(&["Футбол", "Легкая атлетика"]),
            age_groups: tags(&["Подростки (13-17)", "Взрослые (18+)"]),
            contacts: Some("+7 (3462) 555-111".to_string()),
            description: Some(
                "Открытый стадион с футбольным полем и беговыми дорожками".to_string(),
            ),
        },
        NewFacility {
            name: "Фитнес-клуб 'Энергия'".to_string(),
            category: "фитнес-клуб".to_string(),
            address: "ул. Университетская, 9".to_string(),
            sports: tags(&["Тренажерный зал", "Йога", "Кроссфит"]),
            age_groups: tags(&["Взрослые (18+)"]),
            contacts: Some("+7 (3462) 999-000".to_string()),
            description: Some(
                "Современный фитнес-клуб с групповыми программами и тренерами".to_string(),
            ),
        },
    ]
}

fn demo_events() -> Vec<NewSportEvent> {
    let now = Utc::now();
    vec![
        NewSportEvent {
            title: "Открытый турнир по плаванию".to_string(),
            description: Some(
                "Ежегодный городской турнир по плаванию среди любителей".to_string(),
            ),
            event_date: now + Duration::days(14),
            location: Some("Спортивный комплекс 'Олимп', бассейн".to_string()),
        },
        NewSportEvent {
            title: "Городской марафон 'Северный ветер'".to_string(),
            description: Some("Забег на 5, 10 и 21 км по набережной".to_string()),
            event_date: now + Duration::days(30),
            location: Some("Старт: ул. Набережная, 1".to_string()),
        },
        NewSportEvent {
            title: "Ночной хоккейный матч".to_string(),
            description: Some("Товарищеский матч городских любительских команд".to_string()),
            event_date: now + Duration::days(7),
            location: Some("Ледовый дворец 'Айсберг'".to_string()),
        },
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
