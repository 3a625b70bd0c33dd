//! Integration tests for match and membership messages sent through a
//! messenger.

use std::sync::Arc;

use rust_decimal::Decimal;
use santa_core::domains::exchanges::actions::{create_exchange, join_exchange};
use santa_core::domains::exchanges::models::{ExchangeStatus, NewExchange, UserProfile};
use santa_core::kernel::{BaseExchangeStore, InMemoryExchangeStore, ServerDeps, SpyMessenger, TestDependencies};

async fn user(store: &InMemoryExchangeStore, name: &str, chat_id: Option<i64>) -> UserProfile {
    let mut user = UserProfile::new(name);
    user.telegram_chat_id = chat_id;
    store.insert_user(&user).await.unwrap();
    user
}

async fn exchange_for(deps: &ServerDeps, creator: &UserProfile, target_count: u32) -> String {
    create_exchange(
        NewExchange {
            title: "Family swap".to_string(),
            description: String::new(),
            budget: Decimal::new(50, 0),
            target_count,
            creator_id: creator.id,
        },
        deps,
    )
    .await
    .unwrap()
    .code
}

#[tokio::test]
async fn each_linked_giver_gets_their_match() {
    let messenger = Arc::new(SpyMessenger::new());
    let (deps, store) = TestDependencies::messenger_backed(messenger.clone());

    let creator = user(&store, "Organizer", Some(100)).await;
    let code = exchange_for(&deps, &creator, 2).await;
    let ana = user(&store, "Ana", Some(1)).await;
    let ben = user(&store, "Ben", Some(2)).await;

    join_exchange(&code, ana.id, "a red scarf", &deps).await.unwrap();
    join_exchange(&code, ben.id, "board_games", &deps).await.unwrap();

    let to_ana = messenger.sent_to(1);
    assert_eq!(to_ana.len(), 1);
    assert!(to_ana[0].contains("Match Alert"));
    assert!(to_ana[0].contains("*Ben*"));
    assert!(to_ana[0].contains("board\\_games"));

    let to_ben = messenger.sent_to(2);
    assert_eq!(to_ben.len(), 1);
    assert!(to_ben[0].contains("*Ana*"));
    assert!(to_ben[0].contains("a red scarf"));

    let to_creator = messenger.sent_to(100);
    assert_eq!(to_creator.len(), 2);
    assert!(to_creator[0].contains("Participants: 1/2"));
    assert!(to_creator[1].contains("Participants: 2/2"));
}

#[tokio::test]
async fn failed_and_unlinked_chats_do_not_stop_delivery() {
    let messenger = Arc::new(SpyMessenger::new().failing_for(1));
    let (deps, store) = TestDependencies::messenger_backed(messenger.clone());

    let creator = user(&store, "Organizer", None).await;
    let code = exchange_for(&deps, &creator, 3).await;
    let ana = user(&store, "Ana", Some(1)).await;
    let ben = user(&store, "Ben", None).await;
    let cleo = user(&store, "Cleo", Some(3)).await;

    for u in [&ana, &ben, &cleo] {
        join_exchange(&code, u.id, "chocolate", &deps).await.unwrap();
    }

    let exchange = store.find_exchange_by_code(&code).await.unwrap().unwrap();
    assert_eq!(exchange.status, ExchangeStatus::Matched);

    assert!(messenger.sent_to(1).is_empty());
    assert_eq!(messenger.sent_to(3).len(), 1);
    assert_eq!(messenger.sent().len(), 1);
}
