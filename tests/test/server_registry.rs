//local shortcuts
use crate::helpers::*;
use simplenet_remotes::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

#[test]
fn created_primitives_are_retrievable()
{
    let server = Server::new(["alice"]).unwrap();

    let chat = server.create_remote_event("chat").unwrap();
    let moves = server.create_remote_event("moves").unwrap();
    let add = server.create_remote_function("add").unwrap();

    assert_eq!(server.get_remote_event("chat").unwrap(), chat);
    assert_eq!(server.get_remote_event("moves").unwrap(), moves);
    assert_eq!(server.get_remote_function("add").unwrap(), add);
    assert_ne!(chat, moves);
    assert_eq!(chat.name(), "chat");

    // the in-process endpoint mirrors everything
    let alice = server.get_client("alice").unwrap();
    assert_eq!(event_mirror(&alice, "chat").name(), "chat");
    assert_eq!(event_mirror(&alice, "moves").name(), "moves");
    assert_eq!(function_mirror(&alice, "add").name(), "add");
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn lookup_of_unknown_name_fails()
{
    let server = Server::new(no_clients()).unwrap();

    let err = server.get_remote_event("missing").unwrap_err();
    assert_eq!(err, BridgeError::NotFound{ kind: RemoteKind::Event, name: String::from("missing") });
    assert_eq!(err.to_string(), "missing is not a valid RemoteEvent");

    let err = server.get_remote_function("missing").unwrap_err();
    assert_eq!(err.to_string(), "missing is not a valid RemoteFunction");
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn duplicate_names_do_not_overwrite()
{
    let server = Server::new(no_clients()).unwrap();

    let chat = server.create_remote_event("chat").unwrap();
    assert_eq!(
        server.create_remote_event("chat").unwrap_err(),
        BridgeError::DuplicateName{ kind: RemoteKind::Event, name: String::from("chat") }
    );
    assert_eq!(server.get_remote_event("chat").unwrap(), chat);

    let add = server.create_remote_function("add").unwrap();
    assert_eq!(
        server.create_remote_function("add").unwrap_err(),
        BridgeError::DuplicateName{ kind: RemoteKind::Function, name: String::from("add") }
    );
    assert_eq!(server.get_remote_function("add").unwrap(), add);

    // separate namespaces
    let chat_fn = server.create_remote_function("chat").unwrap();
    assert_eq!(server.get_remote_function("chat").unwrap(), chat_fn);
    assert_eq!(server.get_remote_event("chat").unwrap(), chat);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn empty_names_are_rejected()
{
    let server = Server::new(no_clients()).unwrap();

    assert!(matches!(server.create_remote_event(""), Err(BridgeError::InvalidArgument(_))));
    assert!(matches!(server.create_remote_function(""), Err(BridgeError::InvalidArgument(_))));
    assert!(matches!(server.connect(""), Err(BridgeError::InvalidArgument(_))));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn malformed_initial_clients_are_rejected()
{
    assert!(matches!(Server::new(["alice", "alice"]), Err(BridgeError::InvalidArgument(_))));
    assert!(matches!(Server::new(["alice", ""]), Err(BridgeError::InvalidArgument(_))));
    assert!(matches!(Server::new([ClientId::from(1), ClientId::from("1")]), Ok(_)));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn duplicate_client_leaves_original_connected()
{
    let server = Server::new(["alice"]).unwrap();
    let chat = server.create_remote_event("chat").unwrap();
    let alice = server.get_client("alice").unwrap();
    let received = Recorder::attach(event_mirror(&alice, "chat").on_client_event());

    assert_eq!(server.connect("alice").unwrap_err(), BridgeError::DuplicateClient(ClientId::from("alice")));

    assert!(alice.is_connected());
    assert_eq!(server.get_client("alice").unwrap(), alice);
    chat.fire_client(&alice, args!["still here"]).unwrap();
    assert_eq!(received.values(), vec![args!["still here"]]);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn disconnect_lifecycle()
{
    let server = Server::new(["alice", "bob"]).unwrap();
    let alice = server.get_client("alice").unwrap();

    server.disconnect("alice").unwrap();
    assert!(!alice.is_connected());
    assert!(!alice.is_destroyed());
    assert!(!alice.endpoint().unwrap().is_open());
    assert_eq!(server.get_client("alice").unwrap_err(), BridgeError::ClientNotFound(ClientId::from("alice")));

    // departed ids are a no-op, unknown ids are not
    server.disconnect("alice").unwrap();
    alice.disconnect();
    assert_eq!(server.disconnect("carol").unwrap_err(), BridgeError::ClientNotFound(ClientId::from("carol")));

    // ids are reusable
    let alice_again = server.connect("alice").unwrap();
    assert_ne!(alice_again, alice);
    assert!(alice_again.is_connected());
    assert_eq!(server.get_client("alice").unwrap(), alice_again);

    // a stale handle does not evict the new client
    alice.disconnect();
    assert_eq!(server.get_client("alice").unwrap(), alice_again);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn client_snapshots()
{
    let server = Server::new(["carol", "alice"]).unwrap();
    let bob = server.connect("bob").unwrap();
    let seven = server.connect(7).unwrap();

    let listed: Vec<ClientId> = server.get_clients_listed().unwrap().iter().map(|c| c.id().clone()).collect();
    assert_eq!(listed, vec![ClientId::from("alice"), ClientId::from("bob"), ClientId::from("carol"), ClientId::from(7)]);

    let mapped = server.get_clients_mapped().unwrap();
    assert_eq!(mapped.len(), 4);
    assert_eq!(mapped.get(&ClientId::from("bob")), Some(&bob));
    assert_eq!(mapped.get(&ClientId::from(7)), Some(&seven));

    bob.disconnect();
    assert_eq!(server.get_clients_listed().unwrap().len(), 3);
    assert!(!server.get_clients_mapped().unwrap().contains_key(&ClientId::from("bob")));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn client_type_predicate()
{
    let server = Server::new(["alice"]).unwrap();
    let alice = server.get_client("alice").unwrap();

    assert!(Client::is(&alice));
    assert!(!Client::is(&server));
    assert!(!Client::is(&5u32));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn destroyed_client_rejects_use()
{
    let server = Server::new(["alice"]).unwrap();
    let chat = server.create_remote_event("chat").unwrap();
    let alice = server.get_client("alice").unwrap();

    alice.destroy();
    assert!(alice.is_destroyed());
    assert!(!alice.is_connected());
    assert_eq!(alice.get_remote_event("chat").unwrap_err(), BridgeError::UseAfterDestroy("Client"));
    assert_eq!(alice.get_remote_function("add").unwrap_err(), BridgeError::UseAfterDestroy("Client"));
    assert_eq!(chat.fire_client(&alice, args![1]).unwrap_err(), BridgeError::UseAfterDestroy("Client"));

    // destroy also leaves the server
    assert!(server.get_clients_listed().unwrap().is_empty());
    server.disconnect("alice").unwrap();
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn destroyed_server_rejects_use()
{
    prepare_tracing();

    let server = Server::new(["alice"]).unwrap();
    let chat = server.create_remote_event("chat").unwrap();
    let add = server.create_remote_function("add").unwrap();
    let alice = server.get_client("alice").unwrap();
    let mirror = event_mirror(&alice, "chat");

    server.destroy();
    assert!(server.is_destroyed());

    assert_eq!(server.create_remote_event("other").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.create_remote_function("other").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.connect("bob").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.get_client("alice").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.get_remote_event("chat").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.disconnect("alice").unwrap_err(), BridgeError::UseAfterDestroy("Server"));
    assert_eq!(server.get_clients_listed().unwrap_err(), BridgeError::UseAfterDestroy("Server"));

    assert!(!alice.is_connected());
    assert!(chat.is_destroyed());
    assert!(add.is_destroyed());
    assert_eq!(chat.fire_all_clients(args![1]).unwrap_err(), BridgeError::UseAfterDestroy("RemoteEventServer"));
    assert_eq!(mirror.fire_server(args![1]).unwrap_err(), BridgeError::Disconnected(ClientId::from("alice")));

    // idempotent
    server.destroy();
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn late_clients_learn_existing_primitives()
{
    let server = Server::new(no_clients()).unwrap();
    let _chat = server.create_remote_event("chat").unwrap();
    let _add = server.create_remote_function("add").unwrap();

    let alice = server.connect("alice").unwrap();
    assert!(alice.get_remote_event("chat").unwrap().is_some());
    assert!(alice.get_remote_function("add").unwrap().is_some());
    assert!(alice.get_remote_event("add").unwrap().is_none());

    // without announcements the endpoint stays empty
    let quiet = BridgeConfig{ announce_on_connect: false, ..Default::default() };
    let server = Server::with_config(no_clients(), quiet).unwrap();
    let _chat = server.create_remote_event("chat").unwrap();
    let bob = server.connect("bob").unwrap();
    assert!(bob.get_remote_event("chat").unwrap().is_none());
    assert!(!server.config().announce_on_connect);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn departed_ids_are_bounded()
{
    let config = BridgeConfig{ departed_capacity: 2, ..Default::default() };
    let server = Server::with_config(no_clients(), config).unwrap();

    for id in 1..=3
    {
        server.connect(id).unwrap();
        server.disconnect(id).unwrap();
    }

    // the oldest departure is forgotten
    assert_eq!(server.disconnect(1).unwrap_err(), BridgeError::ClientNotFound(ClientId::from(1)));
    server.disconnect(2).unwrap();
    server.disconnect(3).unwrap();

    // reconnecting frees a slot without evicting the others
    server.connect(2).unwrap();
    server.disconnect(2).unwrap();
    server.disconnect(3).unwrap();
    server.disconnect(2).unwrap();
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn concurrent_connects_keep_registry_consistent()
{
    let server = Server::new(no_clients()).unwrap();
    let chat = server.create_remote_event("chat").unwrap();

    let workers: Vec<_> = (0..8i64)
        .map(|worker|
            {
                let server = server.clone();
                let chat = chat.clone();
                std::thread::spawn(move ||
                    {
                        for n in 0..100i64
                        {
                            let id = worker * 1000 + n;
                            let client = server.connect(id).unwrap();
                            chat.fire_all_clients(args![id]).unwrap();

                            let listed = server.get_clients_listed().unwrap();
                            assert!(listed.windows(2).all(|pair| pair[0].id() < pair[1].id()));
                            assert!(listed.contains(&client));

                            let churn = server.create_remote_function(format!("churn-{}", id)).unwrap();
                            churn.destroy();

                            match n % 3
                            {
                                0 => server.disconnect(id).unwrap(),
                                1 => client.destroy(),
                                _ => (),
                            }
                        }
                    }
                )
            }
        )
        .collect();

    for worker in workers
    {
        worker.join().unwrap();
    }

    let expected: Vec<ClientId> = (0..8i64)
        .flat_map(|worker| (0..100i64).filter(|n| n % 3 == 2).map(move |n| ClientId::from(worker * 1000 + n)))
        .collect();

    let listed = server.get_clients_listed().unwrap();
    let listed_ids: Vec<ClientId> = listed.iter().map(|client| client.id().clone()).collect();
    assert_eq!(listed_ids, expected);
    assert!(listed.iter().all(|client| client.is_connected()));
    assert!(listed.iter().all(|client| client.get_remote_event("chat").unwrap().is_some()));
    assert!(listed.iter().all(|client| client.get_remote_function("churn-0").unwrap().is_none()));

    let mapped = server.get_clients_mapped().unwrap();
    assert_eq!(mapped.len(), expected.len());
    assert!(expected.iter().all(|id| mapped.contains_key(id)));

    // departed ids from every worker are remembered
    server.disconnect(0).unwrap();
    server.disconnect(7001).unwrap();
    assert!(matches!(server.get_remote_function("churn-5"), Err(BridgeError::NotFound{ .. })));
}

//-------------------------------------------------------------------------------------------------------------------
