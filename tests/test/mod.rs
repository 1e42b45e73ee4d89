mod mock_remote_event;
mod server_registry;

// server registry
//distinct names are retrievable and yield the created object
//duplicate names fail without overwriting, events and functions have separate namespaces
//duplicate client ids fail and leave the original connected
//disconnect is a no-op for departed ids and fails for unknown ids, ids are reusable
//only the most recent departed ids are remembered
//concurrent connects, fires and disconnects of different ids leave the registry consistent
//destroyed server rejects every operation

// remote events
//fire_client reaches only the target client
//fire_all_clients reaches each connected client once, never a later client
//fire_all_clients skips a client whose channel rejects frames
//fire_server reaches the server with the originating client
//destroying an event retracts the client mirrors

// remote functions
//invoke_server returns the handler's response
//concurrent invokes from two clients answered out of order each get their own response
//destroying a client unblocks its pending invocation promptly
//timeouts, missing handlers, unknown functions, and destroyed functions fail the caller
//a handler may invoke back across the same link

// mock channel
//frames racing a handler install keep their order

// queued channel
//frames on one channel arrive in order
//frames sent before a disconnect arrive before the close
//invokes and disconnects behave the same as over the synchronous channel
//a client endpoint can live behind an accepted channel

// mock remote event
//fire_server(x) is observed on on_server_event as exactly x
