//! User-facing reply texts and list rendering.
//!
//! All chat text lives here and in the router; the progression engine and
//! the dialog store never format messages.

use crate::models::{Achievement, Facility, SportEvent, UserStats};
use crate::progression::Progress;

/// Generic reply for storage failures. No partial success is claimed.
pub const TRY_AGAIN_LATER: &str =
    "Произошла ошибка при обработке вашего запроса. Пожалуйста, попробуйте позже.";

/// Fixed command overview appended to the greeting.
pub const COMMAND_OVERVIEW: &str = "🏆 Я ваш персональный спортивный помощник в Сургуте!\n\n\
     Вот что я умею:\n\
     🔍 /find - Найти спортивные объекты\n\
     📊 /stats - Моя статистика и уровень\n\
     🏅 /achievements - Мои достижения\n\
     🎯 /recommend - Персональные рекомендации\n\
     🏁 /events - Ближайшие мероприятия\n\n\
     Вы также можете задавать вопросы в свободной форме.";

pub const HELP: &str = "🆘 Помощь по использованию бота\n\n\
     Основные команды:\n\
     🔍 /find - Поиск спортивных объектов по параметрам\n\
     📊 /stats - Ваша статистика и уровень\n\
     🏅 /achievements - Ваши достижения\n\
     🎯 /recommend - Персональные рекомендации\n\
     🏁 /events - Ближайшие спортивные мероприятия\n\n\
     Примеры запросов:\n\
     • Где можно заняться плаванием в центре города?\n\
     • Какие есть секции для детей 10 лет?\n\
     • Посоветуй интересные спортивные активности\n\
     • Какие мероприятия будут в эти выходные?\n\n\
     Чем чаще вы посещаете спортивные объекты, тем выше ваш уровень и больше достижений!";

/// First dialog step: sport-type menu.
pub const SPORT_MENU: &str = "⚽ Какой вид спорта вас интересует?\n\n\
     Например: Футбол, Хоккей, Плавание, Йога, Тренажерный зал или свой вариант.";

/// Second dialog step: age-group menu.
pub const AGE_MENU: &str = "👶 Для какой возрастной группы ищем занятия?\n\n\
     Например: Дети (до 12), Подростки (13-17), Взрослые (18+), Все возрасты.";

pub const NO_FACILITIES_FOUND: &str =
    "😕 Не нашел подходящих спортивных объектов по вашим критериям.\n\
     Попробуйте изменить параметры поиска или воспользуйтесь /recommend для персональных рекомендаций.";

pub const VISIT_USAGE: &str = "Пожалуйста, укажите номер объекта после команды, например:\n\
     /visit 1 - чтобы отметить посещение первого объекта из последнего поиска";

pub const VISIT_BAD_INDEX: &str = "Не удалось найти объект с таким номером. \
     Пожалуйста, выполните поиск снова и укажите корректный номер.";

pub const NOT_REGISTERED: &str = "Вы еще не зарегистрированы. Напишите /start";

pub const NO_ACHIEVEMENTS: &str = "У вас пока нет достижений. 🏆\n\
     Посещайте спортивные объекты, повышайте уровень и получайте достижения!";

pub const NO_EVENTS: &str = "На данный момент нет запланированных мероприятий. 🗓\n\
     Попробуйте проверить позже или посмотрите спортивные объекты командой /find";

pub const SHORT_QUERY_HINT: &str = "Пожалуйста, уточните ваш запрос или воспользуйтесь одной из команд:\n\
     /find - поиск объектов\n\
     /events - мероприятия\n\
     /recommend - рекомендации";

/// Render a search result list with 1-based indices and the visit hint.
pub fn facility_list(facilities: &[Facility]) -> String {
    let mut out = String::from("🏟 Найденные спортивные объекты:\n\n");
    for (idx, facility) in facilities.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n📍 Адрес: {}\n🏷 Виды спорта: {}\n👥 Возраст: {}\n📞 Контакты: {}\n",
            idx + 1,
            facility.name,
            facility.category,
            facility.address,
            facility.sports.join(", "),
            facility.age_groups.join(", "),
            facility.contacts.as_deref().unwrap_or("не указаны"),
        ));
        if let Some(description) = &facility.description {
            out.push_str(&format!("📝 Описание: {description}\n"));
        }
        out.push('\n');
    }
    out.push_str(
        "После посещения вы можете отметить его командой /visit [номер], \
         чтобы получить опыт и повысить уровень!",
    );
    out
}

/// Render the confirmation for a recorded visit, including any level-up
/// and freshly granted achievements.
pub fn visit_recorded(
    facility_name: &str,
    xp_awarded: i64,
    level: i64,
    leveled_up: bool,
    new_achievements: &[String],
) -> String {
    let mut out = format!(
        "✅ Отлично! Вы отметили посещение {facility_name}.\n\
         +{xp_awarded} опыта! Проверьте свой прогресс командой /stats"
    );
    if leveled_up {
        out.push_str(&format!(
            "\n\n🎉 Поздравляем! Вы достигли {level} уровня!\n\
             Продолжайте в том же духе и открывайте новые достижения!"
        ));
    }
    for name in new_achievements {
        out.push_str(&format!(
            "\n\n🏆 Новое достижение: {name}!\n\
             Посмотреть все достижения: /achievements"
        ));
    }
    out
}

/// Render the stats card; `motivation` is the AI paragraph (or fallback).
pub fn stats_card(stats: &UserStats, progress: &Progress, motivation: &str) -> String {
    let bar: String = "🟩".repeat(progress.filled_segments)
        + &"⬜".repeat(10 - progress.filled_segments.min(10));
    format!(
        "📊 Ваша спортивная статистика:\n\n\
         🏅 Уровень: {}\n\
         ⭐ Опыт: {}/{}\n\
         📈 Прогресс: {} {}%\n\
         🏋️ Всего посещений: {}\n\
         ⚽ Основные активности: {}\n\
         📅 Дата регистрации: {}\n\n\
         {}\n\n\
         Продолжайте тренировки! Каждое посещение приносит вам опыт.",
        stats.current_level,
        stats.experience_points,
        progress.threshold,
        bar,
        progress.percent,
        stats.visit_count,
        if stats.activities.is_empty() {
            "пока нет данных".to_string()
        } else {
            stats.activities.join(", ")
        },
        stats.registration_date.format("%d.%m.%Y"),
        motivation,
    )
}

/// Render the achievements list, newest first.
pub fn achievement_list(achievements: &[Achievement]) -> String {
    let mut out = String::from("🏆 Ваши достижения:\n\n");
    for achievement in achievements {
        out.push_str(&format!(
            "• {} ({})\n   {}\n\n",
            achievement.name,
            achievement.granted_at.format("%d.%m.%Y"),
            achievement.description,
        ));
    }
    out
}

/// Render the upcoming events list.
pub fn event_list(events: &[SportEvent]) -> String {
    let mut out = String::from("📅 Ближайшие спортивные мероприятия:\n\n");
    for event in events {
        out.push_str(&format!(
            "• {}\n  🕒 {}\n  📍 {}\n  ℹ️ {}\n\n",
            event.title,
            event.event_date.format("%d.%m.%Y в %H:%M"),
            event.location.as_deref().unwrap_or("уточняется"),
            event.description.as_deref().unwrap_or(""),
        ));
    }
    out
}

/// Wrap AI recommendations with the fixed framing.
pub fn recommendations(text: &str) -> String {
    format!(
        "🎯 Персональные рекомендации для вас:\n\n{text}\n\n\
         Хотите найти конкретные места? Напишите /find"
    )
}
