//! Simple consumer example using the in-process loopback broker

use std::time::Duration;

use simplemq::*;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 simplemq - Simple Consumer Example");
    println!("=====================================");

    let broker = LoopbackBroker::new();

    let config = ConsumerConfigBuilder::new()
        .brokers(vec!["localhost:9092"])
        .group_id("demo-group")
        .build()?;

    let mut consumer = Consumer::create(
        |_native| broker.client(),
        vec!["demo-topic".to_string()],
        config,
    );

    // Handlers run in registration order; a failing handler never blocks
    // the ones after it
    consumer.on_message(|message: MessageEnvelope| -> HandlerResult {
        println!(
            "📥 handler 1: topic={} partition={:?} offset={:?} payload={}",
            message.topic(),
            message.partition(),
            message.offset(),
            String::from_utf8_lossy(message.payload()),
        );
        Ok(())
    });
    consumer.on_message(|message: MessageEnvelope| -> HandlerResult {
        println!(
            "📥 handler 2: key={:?} size={:?}",
            message.key(),
            message.size()
        );
        Ok(())
    });
    consumer.on_disconnect(|| println!("⚠️  connection lost"));

    consumer.connect().await?;
    println!("✅ Consumer connected and subscribed to {:?}", consumer.topics());

    // Feed the topic from a producer on the same loopback broker
    let mut producer = Producer::create(|_native| broker.client(), ProducerConfig::from_host_port("localhost", 9092)?);
    producer.set_topic("demo-topic");
    for i in 0..3 {
        let key = format!("key-{}", i);
        let value = format!("message #{}", i);
        producer.send(key, value, None).await?;
    }
    println!("✅ Produced 3 records");

    // Give the dispatch task a moment to fan the records out
    sleep(Duration::from_millis(100)).await;

    let snapshot = consumer.metrics().snapshot();
    println!(
        "📊 records_dispatched={} handler_errors={}",
        snapshot.records_dispatched, snapshot.handler_errors
    );

    println!("\n🎉 Consumer example completed successfully!");

    Ok(())
}
