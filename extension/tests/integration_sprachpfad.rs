//! Abgefangene Broadcasts in beiden Modi

mod common;

use std::sync::Arc;

use common::*;
use voicebridge_audio::{le_bytes_to_samples, CodecConfig, OpusVoiceCodec, VoiceCodec};
use voicebridge_core::{AccountId, PayloadMode};
use voicebridge_voice::{ClientHandle, InterceptOutcome, PassThroughReason, VolumeBuffer};

/// Ein gueltiger Opus-Frame mit einem Sinus
fn opus_frame() -> Vec<u8> {
    let config = CodecConfig::default();
    let mut codec = OpusVoiceCodec::new(&config).unwrap();
    let pcm: Vec<i16> = (0..config.frame_samples())
        .map(|i| ((i as f32 * 0.1).sin() * 8000.0) as i16)
        .collect();
    let mut out = vec![0u8; config.frame_bytes()];
    codec.encode_frame(&pcm, &mut out).unwrap();
    out
}

#[test]
fn ungueltige_und_inaktive_slots_bleiben_byte_gleich() {
    let (mut ext, _, spieler) = laden(&passthrough_config());
    ext.engine_mut().antwort = Some(vec![0; 3]);
    ext.pipeline_mut()
        .slots_mut()
        .host_mut()
        .verbinden(slot(2), 5);
    ext.pipeline_mut()
        .slots_mut()
        .host_mut()
        .ladebildschirm(slot(2));

    let payload: Vec<u8> = (0..64).collect();
    let faelle = [
        (-1, PassThroughReason::SlotUngueltig),
        (64, PassThroughReason::SlotUngueltig),
        (2, PassThroughReason::ClientInaktiv),
        (30, PassThroughReason::ClientInaktiv),
    ];
    for (raw, grund) in faelle {
        let outcome = ext.broadcast_voice(spieler, raw, &payload, true);
        assert_eq!(outcome, InterceptOutcome::PassThrough(grund));
    }

    let aufrufe = &ext.pipeline().hook().aufrufe;
    assert_eq!(aufrufe.len(), faelle.len());
    assert!(aufrufe.iter().all(|(c, p, f)| *c == spieler && *p == payload && *f));
    assert!(ext.engine().eingaenge.is_empty());
}

#[test]
fn passthrough_ohne_zuordnung_gain_eins() {
    let (mut ext, _, spieler) = laden(&passthrough_config());

    ext.broadcast_voice(spieler, 1, &[1, 2, 3], false);

    let eingang = &ext.engine().eingaenge[0];
    assert_eq!(eingang.gain, Some(1.0));
    assert_eq!(eingang.account_id, AccountId(76561198000000001));
    assert_eq!(eingang.mode, PayloadMode::Passthrough);
    assert_eq!(ext.pipeline().hook().aufrufe[0].1, vec![1, 2, 3]);
}

#[test]
fn zuordnung_installieren_und_entfernen() {
    let (mut ext, _, spieler) = laden(&passthrough_config());
    let buffer = Arc::new(VolumeBuffer::neu(64));
    buffer.set(1, 0.25);

    ext.client_to_voice_volume_map(Some(Arc::clone(&buffer)), true);
    ext.broadcast_voice(spieler, 1, &[1], false);
    assert_eq!(ext.engine().eingaenge[0].gain, Some(0.25));

    // Skript aendert den Puffer, die Bruecke sieht es beim naechsten Frame
    buffer.set(1, 0.75);
    ext.broadcast_voice(spieler, 1, &[1], false);
    assert_eq!(ext.engine().eingaenge[1].gain, Some(0.75));

    ext.client_to_voice_volume_map(None, false);
    ext.broadcast_voice(spieler, 1, &[1], false);
    assert_eq!(ext.engine().eingaenge[2].gain, Some(1.0));
    assert!(!ext.pipeline().volume().is_installed());
    for s in 0..64 {
        assert_eq!(ext.pipeline().volume().gain(slot(s)), 1.0);
    }
}

#[test]
fn passthrough_antwort_der_engine_wird_gesendet() {
    let (mut ext, _, spieler) = laden(&passthrough_config());
    ext.engine_mut().antwort = Some(vec![0xCA, 0xFE]);

    let outcome = ext.broadcast_voice(spieler, 1, &[1, 2, 3, 4], true);

    assert_eq!(outcome, InterceptOutcome::Ersetzt);
    assert_eq!(
        ext.pipeline().hook().aufrufe,
        vec![(spieler, vec![0xCA, 0xFE], true)]
    );
}

#[test]
fn transcode_engine_sieht_pcm_und_payload_bleibt() {
    let (mut ext, _, spieler) = laden(&transcode_config());
    ext.engine_mut().antwort = Some(vec![1]);
    let frame = opus_frame();

    let outcome = ext.broadcast_voice(spieler, 1, &frame, false);

    assert_eq!(outcome, InterceptOutcome::Beobachtet);
    assert_eq!(ext.pipeline().hook().aufrufe[0].1, frame);
    let eingang = &ext.engine().eingaenge[0];
    assert_eq!(eingang.mode, PayloadMode::Transcode);
    assert_eq!(eingang.gain, None);
    assert_eq!(
        le_bytes_to_samples(&eingang.payload).len(),
        CodecConfig::default().frame_samples()
    );
}

#[test]
fn transcode_mit_lautstaerke_kodiert_neu() {
    let (mut ext, _, spieler) = laden(&transcode_config());
    let buffer = Arc::new(VolumeBuffer::neu(64));
    buffer.set(1, 0.5);
    ext.client_to_voice_volume_map(Some(buffer), true);
    let frame = opus_frame();

    let outcome = ext.broadcast_voice(spieler, 1, &frame, false);

    assert_eq!(outcome, InterceptOutcome::Skaliert);
    let gesendet = &ext.pipeline().hook().aufrufe[0].1;
    assert_eq!(gesendet.len(), CodecConfig::default().frame_bytes());
}

#[test]
fn transcode_muell_ist_pass_through() {
    let (mut ext, _, spieler) = laden(&transcode_config());
    // Ungueltiger TOC, Decoder liefert nichts
    let muell = vec![0xFF; 3];

    let outcome = ext.broadcast_voice(spieler, 1, &muell, false);

    assert!(outcome.ist_pass_through());
    assert_eq!(ext.pipeline().hook().aufrufe[0].1, muell);
}

#[test]
fn metriken_zaehlen_ergebnisse() {
    let (mut ext, _, spieler) = laden(&passthrough_config());
    ext.broadcast_voice(spieler, 1, &[1], false);
    ext.broadcast_voice(spieler, 99, &[1], false);
    ext.broadcast_voice(ClientHandle(0), 5, &[1], false);

    let m = ext.metrics();
    assert_eq!(m.frames_total.with_label_values(&["ersetzt"]).get(), 1);
    assert_eq!(m.frames_total.with_label_values(&["slot_ungueltig"]).get(), 1);
    assert_eq!(m.frames_total.with_label_values(&["client_inaktiv"]).get(), 1);
    assert_eq!(m.inbound_seconds.get_sample_count(), 3);
    assert_eq!(ext.pipeline().stats().frames, 3);
}
