//! Prompt templates for the text-generation service.
//!
//! Pure string builders; the router composes the data, the adapter sends
//! it. Context stays bounded: callers pass pre-limited samples of
//! facilities and events.

use crate::models::{Facility, SportEvent, UserStats};

/// Prompt for a personalized greeting on first contact.
pub fn greeting(first_name: Option<&str>) -> String {
    format!(
        "Сгенерируй дружелюбное приветствие для нового пользователя спортивного чат-бота. \
         Имя пользователя: {}. \
         Бот помогает находить спортивные объекты в Сургуте, записываться на тренировки и участвовать в челленджах. \
         Приветствие должно быть кратким (1-2 предложения), мотивирующим и включать эмодзи.",
        first_name.unwrap_or("друг")
    )
}

/// Prompt for the motivation paragraph in the stats view.
pub fn stats_motivation(stats: &UserStats, registered: &str) -> String {
    format!(
        "Пользователь спортивного чат-бота запросил свою статистику. \
         Уровень: {}, опыт: {}, посещений: {}. \
         Основные активности: {}. \
         Дата регистрации: {}. \
         Напиши мотивирующее сообщение на 2-3 предложения, отмечая достижения \
         и предлагая варианты для дальнейшего роста. Используй эмодзи.",
        stats.current_level,
        stats.experience_points,
        stats.visit_count,
        activities_digest(&stats.activities),
        registered,
    )
}

/// Instruction line sent with the recommendation context.
pub fn recommend_instruction() -> &'static str {
    "Сгенерируй персональные спортивные рекомендации"
}

/// System context for the recommendation handler.
pub fn recommend_context(level: i64, activities: &[String], facilities: &[Facility]) -> String {
    let mut context = format!(
        "Ты - спортивный помощник для жителей Сургута. \
         Пользователь запросил персональные рекомендации. \
         Уровень пользователя: {level}\n\
         Его основные активности: {}\n\n\
         Доступные спортивные объекты:\n",
        activities_digest(activities),
    );

    for facility in facilities {
        context.push_str(&format!(
            "- {} ({}): {}, возраст: {}\n  Описание: {}\n",
            facility.name,
            facility.category,
            facility.sports.join(", "),
            facility.age_groups.join(", "),
            facility.description.as_deref().unwrap_or("нет описания"),
        ));
    }

    context.push_str(
        "\nСгенерируй 2-3 персонализированные рекомендации для пользователя \
         на основе его уровня и предпочтений. Ответ должен быть кратким, \
         дружелюбным и мотивирующим. Используй эмодзи.",
    );
    context
}

/// System context for free-text questions: scope instruction plus bounded
/// facility and event digests.
pub fn free_text_context(level: i64, facilities: &[Facility], events: &[SportEvent]) -> String {
    let mut context = format!(
        "Ты - спортивный помощник для жителей Сургута. \
         Отвечай только на вопросы, связанные со спортом. \
         Уровень пользователя: {level}\n\n\
         Спортивные объекты:\n",
    );

    for facility in facilities {
        context.push_str(&format!(
            "- {} ({}): {}, адрес: {}\n",
            facility.name,
            facility.category,
            facility.sports.join(", "),
            facility.address,
        ));
    }

    context.push_str("\nМероприятия:\n");
    for event in events {
        context.push_str(&format!(
            "- {} ({}): {}\n",
            event.title,
            event.event_date.format("%d.%m.%Y"),
            event.description.as_deref().unwrap_or(""),
        ));
    }

    context.push_str(
        "\nБудь вежливым, кратким (3-5 предложений) и используй эмодзи. \
         Если вопрос не по теме, вежливо сообщи, что можешь помочь только со спортивными вопросами.",
    );
    context
}

fn activities_digest(activities: &[String]) -> String {
    if activities.is_empty() {
        "пока нет данных".to_string()
    } else {
        activities.join(", ")
    }
}
