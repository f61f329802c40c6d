use crate::cli::Commands;
use crate::literal;

use anyhow::Result;
use rlinda::{fmt_payload, Node};
use std::time::Duration;

pub async fn run(node: &Node, command: Commands) -> Result<()> {
  match command {
    Commands::Out(args) => {
      let tuple = literal::parse_values(&args.data)?;
      node.out_tuple(&tuple).await?;
      println!("ok");
    }
    Commands::In(args) => {
      let pattern = literal::parse_values(&args.data)?;
      let timeout = args.timeout.map(Duration::from_secs_f64);
      let tuple = node.in_tuple(&pattern, timeout).await?;
      println!("{}", fmt_payload(&tuple));
    }
    Commands::Inp(args) => {
      let pattern = literal::parse_values(&args.data)?;
      match node.inp_tuple(&pattern).await? {
        Some(tuple) => println!("{}", fmt_payload(&tuple)),
        None => println!("not found"),
      }
    }
    Commands::Rd(args) => {
      let pattern = literal::parse_values(&args.data)?;
      let timeout = args.timeout.map(Duration::from_secs_f64);
      let tuple = node.rd_tuple(&pattern, timeout).await?;
      println!("{}", fmt_payload(&tuple));
    }
    Commands::Dump => {
      for tuple in node.dump_space().await? {
        println!("{}", fmt_payload(&tuple));
      }
    }
    Commands::Monitor => {
      monitor(node).await;
    }
  }
  Ok(())
}

/// Passive monitor: prints every queued `(topic, payload)` pair until the
/// node stops or the user interrupts.
async fn monitor(node: &Node) {
  loop {
    tokio::select! {
      _ = tokio::signal::ctrl_c() => break,
      frame = node.recv_inbox() => match frame {
        Some(frame) => println!("{}", frame),
        None => break,
      },
    }
  }
}
