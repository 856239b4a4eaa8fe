/*!
A streaming decoder for MRT/BGP4MP binary dump files ([RFC 6396]).

It consumes a stream of length-prefixed MRT records and reports decoded
events — RIB snapshot entries, BGP finite-state-machine transitions, and
captured BGP protocol messages — through caller-supplied sink closures.

[RFC 6396]: https://datatracker.ietf.org/doc/html/rfc6396

# Example

```no_run
use mrt_stream::parser::MrtDecoder;
use std::fs::File;

let file = File::open("rib.mrt").unwrap();
MrtDecoder::new(file)
    .on_dump(|record, _peer| println!("{}", record.prefix))
    .on_state(|event| println!("{:?} -> {:?}", event.old_state, event.new_state))
    .on_message(|event| println!("{} bytes", event.msg.len()))
    .run()
    .unwrap();
```
*/

pub mod error;
pub mod models;
pub mod parser;

pub use error::ParserError;
pub use parser::MrtDecoder;
