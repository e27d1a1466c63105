//! Simple producer example using the in-process loopback broker

use simplemq::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 simplemq - Simple Producer Example");
    println!("=====================================");

    let broker = LoopbackBroker::new();

    // Config from a builder; host+port and address-list constructors
    // normalize to the same canonical form
    let config = ProducerConfigBuilder::new()
        .broker("localhost", 9092)
        .build()?;
    println!(
        "✅ Config normalized to bootstrap.servers={}",
        config.bootstrap_servers()
    );

    let mut producer = Producer::create(|_native| broker.client(), config);
    producer.set_topic("demo-topic");

    // Example 1: first send connects implicitly, then delivers exactly once
    producer.send("user-123", "Hello from simplemq!", None).await?;
    println!("✅ Sent first record - state: {:?}", producer.state());

    // Example 2: chained sends on the established connection
    producer
        .send("user-456", "Second record", None)
        .await?
        .send("user-789", "Third record", None)
        .await?;
    println!("✅ Sent chained records");

    // Example 3: redundant connect on an established connection is a no-op
    producer.connect().await?;
    println!("✅ Redundant connect resolved immediately");

    let snapshot = producer.metrics().snapshot();
    println!(
        "📊 records_sent={} bytes_sent={} connections_established={}",
        snapshot.records_sent, snapshot.bytes_sent, snapshot.connections_established
    );

    println!("\n🎉 Producer example completed successfully!");
    println!("💡 Try running the consumer example next:");
    println!("   cargo run --example simple_consumer");

    Ok(())
}
