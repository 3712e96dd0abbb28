//! Unit tests for the dialog session store.

#[cfg(test)]
mod session_tests {
    use std::time::Duration;

    use super::super::{DialogState, SessionStore};
    use crate::models::Facility;

    fn facility(id: i64, name: &str) -> Facility {
        Facility {
            id,
            name: name.to_string(),
            category: "зал".to_string(),
            address: "ул. Тестовая, 1".to_string(),
            sports: vec!["Футбол".to_string()],
            age_groups: vec!["Взрослые (18+)".to_string()],
            contacts: None,
            description: None,
        }
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn unknown_user_is_idle() {
        let store = SessionStore::new(TTL);
        assert_eq!(store.state(42).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn flow_advances_through_both_steps() {
        let store = SessionStore::new(TTL);
        store.begin_search(1).await;
        assert_eq!(store.state(1).await, DialogState::AwaitingSportType);

        store.select_sport(1, "Футбол").await;
        assert_eq!(store.state(1).await, DialogState::AwaitingAgeGroup);

        let sport = store.take_pending_sport(1).await;
        assert_eq!(sport.as_deref(), Some("Футбол"));
        assert_eq!(store.state(1).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn result_at_is_one_based() {
        let store = SessionStore::new(TTL);
        store
            .attach_results(1, vec![facility(10, "Олимп"), facility(11, "Дельфин")])
            .await;

        assert_eq!(store.result_at(1, 2).await.map(|f| f.id), Some(11));
        assert_eq!(store.result_at(1, 1).await.map(|f| f.id), Some(10));
        assert!(store.result_at(1, 0).await.is_none());
        assert!(store.result_at(1, 3).await.is_none());
    }

    #[tokio::test]
    async fn cancel_flow_keeps_attached_results() {
        let store = SessionStore::new(TTL);
        store.attach_results(1, vec![facility(10, "Олимп")]).await;
        store.begin_search(1).await;
        store.cancel_flow(1).await;

        assert_eq!(store.state(1).await, DialogState::Idle);
        assert_eq!(store.result_at(1, 1).await.map(|f| f.id), Some(10));
    }

    #[tokio::test]
    async fn clear_drops_results_too() {
        let store = SessionStore::new(TTL);
        store.attach_results(1, vec![facility(10, "Олимп")]).await;
        store.clear(1).await;
        assert!(store.result_at(1, 1).await.is_none());
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::from_millis(5));
        store.begin_search(1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.state(1).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn sessions_are_per_user() {
        let store = SessionStore::new(TTL);
        store.begin_search(1).await;
        assert_eq!(store.state(2).await, DialogState::Idle);
    }
}
