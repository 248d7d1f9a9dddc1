//! Transmission engine scenarios
//!
//! Covers enablement, loss handling, stream vs. packet sizing, graceful
//! degradation and drop reasons.

use cell_simulator_core_rs::capacity;
use cell_simulator_core_rs::core::time::SECOND;
use cell_simulator_core_rs::engine::{
    NackReason, TransmissionEngine, TransmissionInput, TransmissionResult, TransmissionStatus,
};
use cell_simulator_core_rs::models::{Message, NodeCapacity, Region, TransmissionDirection};
use cell_simulator_core_rs::transmission::{
    ChannelProperties, ConfiguredTransmissionModel, DelayModel, FixedTransmissionModel,
    RegionProperties, TransmissionConfig, TransmissionModel,
};
use cell_simulator_core_rs::RngManager;

use NackReason::{ChannelCapacityExceeded, NodeCapacityExceeded, NodeDeactivated, PacketLoss};
use TransmissionDirection::{DownlinkMulticast, DownlinkUnicast, UplinkUnicast};

// ============================================================================
// Test Helpers
// ============================================================================

fn region(capacity: i64) -> Region {
    let props = RegionProperties::uniform(ChannelProperties::new(DelayModel::Constant {
        delay: SECOND,
    }));
    Region::new("downtown", Some(capacity), Some(capacity), props)
}

fn node(capacity: i64) -> NodeCapacity {
    NodeCapacity::new("veh_0", true).with_bitrates(Some(capacity), Some(capacity))
}

fn run(
    engine: &mut TransmissionEngine,
    model: &dyn TransmissionModel,
    start_time_ns: i64,
    message: &Message,
    direction: TransmissionDirection,
    region: &mut Region,
    node: Option<&mut NodeCapacity>,
) -> TransmissionResult {
    let mut rng = RngManager::new(1);
    engine.process(
        TransmissionInput {
            start_time_ns,
            message,
            direction,
            node_id: Some("veh_0"),
            region,
            node,
        },
        model,
        &mut rng,
    )
}

// ============================================================================
// Capacity scenarios
// ============================================================================

#[test]
fn test_sufficient_capacity_is_consumed_and_restored() {
    let mut r = region(1_000);
    let mut n = node(1_000);
    let message = Message::packet("server", 600);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(3 * SECOND),
        0,
        &message,
        DownlinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.status, TransmissionStatus::SentAcknowledged);
    assert_eq!(result.reserved_bps, 200);
    assert_eq!(result.end_time_ns, 3 * SECOND);
    assert_eq!(r.remaining(DownlinkUnicast), 800);
    assert_eq!(n.remaining(DownlinkUnicast), 800);

    capacity::free(DownlinkUnicast, Some(&mut r), Some(&mut n), result.reserved_bps);
    assert_eq!(r.remaining(DownlinkUnicast), 1_000);
    assert_eq!(n.remaining(DownlinkUnicast), 1_000);
}

#[test]
fn test_disabled_node_is_dropped() {
    let mut r = region(1_000);
    let mut n = node(1_000);
    n.set_enabled(false);
    let message = Message::packet("veh_0", 600);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        5 * SECOND,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.status, TransmissionStatus::Dropped(vec![NodeDeactivated]));
    assert!(!result.is_processed());
    assert_eq!(result.end_time_ns, 5 * SECOND);
    assert_eq!(result.reserved_bps, 0);
    assert_eq!(r.remaining(UplinkUnicast), 1_000);
}

#[test]
fn test_insufficient_capacity_degrades_to_available() {
    let mut r = region(2_000);
    let mut n = node(2_000);
    // 4000 bit in 1 s → needs 4000 bps
    let message = Message::packet("veh_0", 4_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert!(result.is_processed());
    assert!(result.is_acknowledged());
    assert_eq!(result.reserved_bps, 2_000);
    assert_eq!(result.end_time_ns, 2 * SECOND, "half the bandwidth, twice the time");
    assert_eq!(r.remaining(UplinkUnicast), 0);
    assert_eq!(n.remaining(UplinkUnicast), 0);
}

#[test]
fn test_degraded_retransmissions_scale_end_time() {
    let mut r = region(2_000);
    let mut n = node(2_000);
    let message = Message::packet("veh_0", 4_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND).with_outcome(true, 2),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.reserved_bps, 2_000);
    assert_eq!(result.end_time_ns, 4 * SECOND);
}

#[test]
fn test_exhausted_region_drops_with_channel_reason() {
    let mut r = region(0);
    let mut n = node(2_000);
    let message = Message::packet("veh_0", 4_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(
        result.status,
        TransmissionStatus::Dropped(vec![ChannelCapacityExceeded])
    );
    assert_eq!(result.reserved_bps, 0);
    assert_eq!(n.remaining(UplinkUnicast), 2_000);
}

#[test]
fn test_both_exhausted_report_both_reasons() {
    let mut r = region(0);
    let mut n = node(0);
    let message = Message::packet("veh_0", 100);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        DownlinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(
        result.nack_reasons(),
        &[ChannelCapacityExceeded, NodeCapacityExceeded]
    );
}

#[test]
fn test_node_bottleneck_reports_node_reason() {
    let mut r = region(5_000);
    let mut n = node(0);
    let message = Message::packet("veh_0", 100);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.status, TransmissionStatus::Dropped(vec![NodeCapacityExceeded]));
    assert_eq!(r.remaining(UplinkUnicast), 5_000);
}

#[test]
fn test_exhausted_multicast_only_reports_channel() {
    let mut r = region(0);
    let mut starved = node(0);
    let message = Message::packet("server", 100);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        DownlinkMulticast,
        &mut r,
        Some(&mut starved),
    );

    assert_eq!(
        result.status,
        TransmissionStatus::Dropped(vec![ChannelCapacityExceeded])
    );
}

// ============================================================================
// Loss scenarios
// ============================================================================

#[test]
fn test_lost_then_dropped_keeps_reason_order() {
    let mut r = region(0);
    let mut n = node(1_000);
    let message = Message::packet("veh_0", 100);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND).with_outcome(false, 2),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(
        result.status,
        TransmissionStatus::Dropped(vec![PacketLoss, ChannelCapacityExceeded])
    );
    // End time keeps the attempts even though nothing was sent
    assert_eq!(result.end_time_ns, 2 * SECOND);
}

#[test]
fn test_lost_packet_reserves_all_attempts() {
    let mut r = region(10_000);
    let mut n = node(10_000);
    let message = Message::packet("veh_0", 1_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND).with_outcome(false, 4),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(
        result.status,
        TransmissionStatus::SentUnacknowledged(vec![PacketLoss])
    );
    assert_eq!(result.reserved_bps, 4_000);
    assert_eq!(result.end_time_ns, 4 * SECOND);
    assert_eq!(n.remaining(UplinkUnicast), 6_000);
}

#[test]
fn test_failed_stream_gets_extra_attempt() {
    let mut r = region(10_000);
    let mut n = node(10_000);
    let message = Message::stream("veh_0", 8_000, 10 * SECOND, 3_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND).with_outcome(false, 2),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.status, TransmissionStatus::SentAcknowledged);
    assert_eq!(result.end_time_ns, 3 * SECOND);
    assert_eq!(result.reserved_bps, 3_000);
}

#[test]
fn test_stream_never_total_loss() {
    let lossy = ChannelProperties::new(DelayModel::Constant { delay: SECOND }).with_transmission(
        TransmissionConfig {
            loss_probability: 1.0,
            max_retries: 2,
        },
    );
    let mut r = Region::new("r", None, None, RegionProperties::uniform(lossy));
    let mut engine = TransmissionEngine::new();
    let message = Message::stream("veh_0", 1_000, SECOND, 500);

    for seed in 0..50 {
        let mut n = NodeCapacity::new("veh_0", true);
        let mut rng = RngManager::new(seed);
        let result = engine.process(
            TransmissionInput {
                start_time_ns: 0,
                message: &message,
                direction: UplinkUnicast,
                node_id: Some("veh_0"),
                region: &mut r,
                node: Some(&mut n),
            },
            &ConfiguredTransmissionModel,
            &mut rng,
        );
        assert!(result.is_acknowledged());
        // 3 lost attempts + 1 forced
        assert_eq!(result.end_time_ns, 4 * SECOND);
    }
}

// ============================================================================
// Stream sizing
// ============================================================================

#[test]
fn test_stream_does_not_degrade() {
    let mut r = region(10_000);
    let mut n = node(1_000);
    let message = Message::stream("veh_0", 1_000, SECOND, 5_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(result.status, TransmissionStatus::Dropped(vec![NodeCapacityExceeded]));
    assert_eq!(n.remaining(UplinkUnicast), 1_000);
}

#[test]
fn test_stream_both_pools_short() {
    let mut r = region(100);
    let mut n = node(100);
    let message = Message::stream("veh_0", 1_000, SECOND, 5_000);
    let mut engine = TransmissionEngine::new();

    let result = run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        DownlinkUnicast,
        &mut r,
        Some(&mut n),
    );

    assert_eq!(
        result.nack_reasons(),
        &[ChannelCapacityExceeded, NodeCapacityExceeded]
    );
}

// ============================================================================
// Counters
// ============================================================================

#[test]
fn test_engine_counts_every_message() {
    let mut r = region(1_000);
    let mut n = node(1_000);
    let message = Message::packet("veh_0", 100);
    let mut engine = TransmissionEngine::new();
    let model = FixedTransmissionModel::new(SECOND);

    run(&mut engine, &model, 0, &message, UplinkUnicast, &mut r, Some(&mut n));
    run(&mut engine, &model, 0, &message, UplinkUnicast, &mut r, None);
    run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND).with_outcome(false, 1),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );

    let stats = engine.stats();
    assert_eq!(engine.processed_messages(), 3);
    assert_eq!(stats.acknowledged, 1);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.unacknowledged, 1);
}

#[test]
#[should_panic(expected = "cannot compute needed bandwidth")]
fn test_empty_packet_panics() {
    let mut r = region(1_000);
    let mut n = node(1_000);
    let message = Message::packet("veh_0", 0);
    let mut engine = TransmissionEngine::new();

    run(
        &mut engine,
        &FixedTransmissionModel::new(SECOND),
        0,
        &message,
        UplinkUnicast,
        &mut r,
        Some(&mut n),
    );
}
