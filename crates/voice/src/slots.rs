//! Client-Slot-Tabelle – Sicht auf die Clients des Hosts
//!
//! Die Tabelle speichert selbst keinen Verbindungszustand. Jede Abfrage geht
//! direkt an den Host, damit nie auf Basis eines veralteten Zustands
//! gehandelt wird: ein Client kann sich zwischen zwei Frames trennen.

use voicebridge_core::{AccountId, SlotIndex};

// ---------------------------------------------------------------------------
// Host-Schnittstelle
// ---------------------------------------------------------------------------

/// Opaker Handle des Hosts auf einen lebenden Client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle(pub u64);

/// Momentaufnahme eines Slots wie der Host ihn meldet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    /// Verbindung steht
    pub connected: bool,
    /// Client ist im Spiel (nicht mehr im Ladebildschirm)
    pub in_game: bool,
    /// Vom Host erzeugter Bot ohne echten Spieler
    pub fake: bool,
    /// Stabile externe Identitaet
    pub account_id: AccountId,
    /// Handle fuer den Broadcast-Aufruf
    pub handle: ClientHandle,
}

/// Was der Host ueber seine Clients preisgeben muss
pub trait HostClients {
    /// Aktueller Zustand eines Slots, `None` wenn der Slot leer ist
    fn client_info(&self, slot: SlotIndex) -> Option<ClientInfo>;

    /// Erstellt einen Bot mit dem gegebenen Namen und liefert dessen Slot
    fn create_fake_client(&mut self, name: &str) -> Option<SlotIndex>;
}

// ---------------------------------------------------------------------------
// ClientSlotTable
// ---------------------------------------------------------------------------

/// Nur-Lese-Sicht auf bis zu `MAX_SLOTS` Clients
pub struct ClientSlotTable<H> {
    host: H,
}

impl<H: HostClients> ClientSlotTable<H> {
    /// Erstellt eine Tabelle ueber dem gegebenen Host
    pub fn neu(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Zustand des Slots, nur wenn verbunden und im Spiel
    fn aktiv(&self, slot: SlotIndex) -> Option<ClientInfo> {
        self.host
            .client_info(slot)
            .filter(|info| info.connected && info.in_game)
    }

    /// Verbunden und im Spiel
    pub fn is_active(&self, slot: SlotIndex) -> bool {
        self.aktiv(slot).is_some()
    }

    /// Externe Identitaet – nur fuer aktive Slots definiert
    pub fn external_identity(&self, slot: SlotIndex) -> Option<AccountId> {
        self.aktiv(slot).map(|info| info.account_id)
    }

    /// Aktiver Slot, der vom Host als Bot gefuehrt wird
    pub fn is_virtual(&self, slot: SlotIndex) -> bool {
        self.aktiv(slot).is_some_and(|info| info.fake)
    }

    /// Live-Handle des Clients; `None` heisst "inzwischen getrennt"
    pub fn resolve(&self, slot: SlotIndex) -> Option<ClientHandle> {
        self.aktiv(slot).map(|info| info.handle)
    }

    /// Laesst den Host einen neuen Bot anlegen
    pub fn create_virtual(&mut self, name: &str) -> Option<SlotIndex> {
        self.host.create_fake_client(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
