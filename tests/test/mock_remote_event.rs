//local shortcuts
use crate::helpers::*;
use simplenet_remotes::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

#[test]
fn mock_fire_server_round_trip()
{
    let mock = MockRemoteEvent::new("alice");
    let received = Recorder::attach(mock.on_server_event());

    let payload = args![1, "two", 3.0, (), vec![4u8]];
    mock.fire_server(payload.clone()).unwrap();

    assert_eq!(received.values(), vec![(ClientId::from("alice"), payload)]);
    assert_eq!(mock.client(), &ClientId::from("alice"));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn mock_fire_client()
{
    let mock = MockRemoteEvent::new(3);
    let received = Recorder::attach(mock.on_client_event());
    let server_received = Recorder::attach(mock.on_server_event());

    mock.fire_client(&ClientId::from(3), args!["direct"]).unwrap();
    mock.fire_all_clients(args!["everyone"]).unwrap();
    assert_eq!(
        mock.fire_client(&ClientId::from(4), args!["lost"]).unwrap_err(),
        BridgeError::ClientNotFound(ClientId::from(4))
    );

    assert_eq!(received.values(), vec![args!["direct"], args!["everyone"]]);
    assert_eq!(server_received.len(), 0);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn mock_destroy()
{
    let mock = MockRemoteEvent::new("alice");
    let received = Recorder::attach(mock.on_server_event());
    let _ = Recorder::attach(mock.on_client_event());

    mock.destroy();

    assert!(mock.is_destroyed());
    assert_eq!(mock.on_server_event().listener_count(), 0);
    assert_eq!(mock.on_client_event().listener_count(), 0);
    assert_eq!(mock.fire_server(args![1]).unwrap_err(), BridgeError::UseAfterDestroy("MockRemoteEvent"));
    assert_eq!(mock.fire_all_clients(args![1]).unwrap_err(), BridgeError::UseAfterDestroy("MockRemoteEvent"));
    assert_eq!(received.len(), 0);
}

//-------------------------------------------------------------------------------------------------------------------
