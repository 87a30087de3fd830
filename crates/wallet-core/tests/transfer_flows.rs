//! End-to-end transfer flows over mock dependencies: happy paths,
//! registration failures, parked transfers, and peer misbehavior.

use parking_lot::Mutex;
use std::sync::Arc;
use wallet_core::{
    Coin, CoinStatus, ConfirmTransaction, KeyType, MockKeychain, MockNetwork, NodeEvent,
    NodeRequest, PeerId, PeerMessage, Scalar, SystemStateId, TxId, Wallet, WalletConfig,
};

type TestWallet = Wallet<MockKeychain, MockNetwork>;

struct Harness {
    keychain: Arc<MockKeychain>,
    network: Arc<MockNetwork>,
    completed: Arc<Mutex<Vec<TxId>>>,
    wallet: TestWallet,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn harness() -> Harness {
    init_tracing();
    let keychain = Arc::new(MockKeychain::new());
    let network = Arc::new(MockNetwork::new());
    let completed: Arc<Mutex<Vec<TxId>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = completed.clone();
    let wallet = Wallet::new(
        keychain.clone(),
        network.clone(),
        WalletConfig::for_testing(),
        Some(Box::new(move |tx_id| sink.lock().push(tx_id))),
    )
    .unwrap();
    Harness {
        keychain,
        network,
        completed,
        wallet,
    }
}

fn unspent_coin(amount: u64) -> Coin {
    let mut coin = Coin::new(amount, KeyType::Regular, 1);
    coin.status = CoinStatus::Unspent;
    coin
}

/// Run one empty sync round so the wallet flips to synchronized.
async fn synchronize(h: &mut Harness, height: u64) {
    let tip = SystemStateId::new(height, [height as u8; 32]);
    h.wallet
        .on_node_message(NodeEvent::NewTip { id: tip })
        .await
        .unwrap();
    h.wallet
        .on_node_message(NodeEvent::Header {
            description: wallet_core::BlockDescription {
                id: tip,
                definition: [0xee; 32],
            },
        })
        .await
        .unwrap();
    h.wallet
        .on_node_message(NodeEvent::Mined { entries: vec![] })
        .await
        .unwrap();
    assert!(h.wallet.is_synchronized());
    // nothing outstanding, so the sync round closed the node connection
    h.network.take_node_messages();
}

fn sent_invite(network: &MockNetwork) -> (PeerId, wallet_core::InviteReceiver) {
    network
        .tx_messages()
        .into_iter()
        .find_map(|(peer, msg)| match msg {
            PeerMessage::InviteReceiver(data) => Some((peer, data)),
            _ => None,
        })
        .expect("no invitation was sent")
}

fn receiver_ack(tx_id: TxId) -> PeerMessage {
    PeerMessage::ConfirmInvitation(wallet_core::ConfirmInvitation {
        tx_id,
        outputs: vec![wallet_core::Output {
            commitment: wallet_core::Commitment([0x77; 32]),
        }],
        receiver_public_excess: wallet_core::Commitment([1u8; 32]),
        receiver_public_nonce: wallet_core::Commitment([2u8; 32]),
        receiver_signature: Scalar([3u8; 32]),
    })
}

// S1: synchronized send, happy path.
#[tokio::test]
async fn synchronized_send_happy_path() {
    let mut h = harness();
    h.keychain.add_coin(unspent_coin(100));
    synchronize(&mut h, 1).await;

    h.wallet.transfer_money(PeerId(1), 100).await.unwrap();
    let (peer, invite) = sent_invite(&h.network);
    assert_eq!(peer, PeerId(1));
    assert_eq!(invite.amount, 100);
    let tx_id = invite.tx_id;

    h.wallet
        .on_tx_message(PeerId(1), receiver_ack(tx_id))
        .await
        .unwrap();
    // the sender confirmed to the peer and submitted the transaction
    assert!(h
        .network
        .tx_messages()
        .iter()
        .any(|(_, m)| matches!(m, PeerMessage::ConfirmTransaction(c) if c.tx_id == tx_id)));
    let node_msgs = h.network.node_messages();
    assert!(node_msgs
        .iter()
        .any(|m| matches!(m, NodeRequest::NewTransaction { transaction } if transaction.tx_id == tx_id)));
    assert_eq!(h.wallet.pending_registrations(), 1);

    let closes_before = h.network.node_close_count();
    let keep = h
        .wallet
        .on_node_message(NodeEvent::RegistrationResult { value: true })
        .await
        .unwrap();
    assert!(keep);

    // exactly one completion, registries empty, node connection closed
    assert_eq!(h.completed.lock().as_slice(), &[tx_id]);
    assert_eq!(h.wallet.active_transfers(), 0);
    assert_eq!(h.wallet.pending_registrations(), 0);
    assert_eq!(h.network.node_close_count(), closes_before + 1);
    // the peer was told the transfer registered
    assert!(h
        .network
        .tx_messages()
        .iter()
        .any(|(_, m)| matches!(m, PeerMessage::TxRegistered(r) if r.tx_id == tx_id && r.value)));
}

// S2: unsolicited ConfirmTransaction.
#[tokio::test]
async fn unsolicited_confirmation_closes_peer() {
    let mut h = harness();
    h.wallet
        .on_tx_message(
            PeerId(1),
            PeerMessage::ConfirmTransaction(ConfirmTransaction {
                tx_id: TxId::generate(),
                sender_signature: Scalar([5u8; 32]),
            }),
        )
        .await
        .unwrap();
    assert_eq!(h.network.closed_peers(), vec![PeerId(1)]);
    assert_eq!(h.wallet.active_transfers(), 0);
    assert!(h.completed.lock().is_empty());
}

// S4: park-until-sync.
#[tokio::test]
async fn transfer_parks_until_sync_completes() {
    let mut h = harness();
    h.keychain.add_coin(unspent_coin(50));

    h.wallet.transfer_money(PeerId(1), 50).await.unwrap();
    assert_eq!(h.wallet.parked_transfers(), 1);
    assert!(h.network.tx_messages().is_empty());

    synchronize(&mut h, 1).await;

    // the parked sender started inside finish_sync
    assert_eq!(h.wallet.parked_transfers(), 0);
    let (peer, invite) = sent_invite(&h.network);
    assert_eq!(peer, PeerId(1));
    assert_eq!(invite.amount, 50);
}

// S6: registration failure.
#[tokio::test]
async fn registration_failure_fails_the_sender() {
    let mut h = harness();
    h.keychain.add_coin(unspent_coin(100));
    synchronize(&mut h, 1).await;

    h.wallet.transfer_money(PeerId(1), 100).await.unwrap();
    let (_, invite) = sent_invite(&h.network);
    let tx_id = invite.tx_id;
    h.wallet
        .on_tx_message(PeerId(1), receiver_ack(tx_id))
        .await
        .unwrap();
    assert_eq!(h.wallet.pending_registrations(), 1);

    let keep = h
        .wallet
        .on_node_message(NodeEvent::RegistrationResult { value: false })
        .await
        .unwrap();
    assert!(keep);

    assert_eq!(h.completed.lock().as_slice(), &[tx_id]);
    assert_eq!(h.wallet.active_transfers(), 0);
    assert_eq!(h.wallet.pending_registrations(), 0);
    assert!(h
        .network
        .tx_messages()
        .iter()
        .any(|(_, m)| matches!(m, PeerMessage::TxFailed(f) if f.tx_id == tx_id)));
}

#[tokio::test]
async fn insufficient_funds_fails_without_peer_traffic() {
    let mut h = harness();
    h.keychain.add_coin(unspent_coin(10));
    synchronize(&mut h, 1).await;

    h.wallet.transfer_money(PeerId(1), 100).await.unwrap();

    let completed = h.completed.lock().clone();
    assert_eq!(completed.len(), 1);
    assert_eq!(h.wallet.active_transfers(), 0);
    // no invitation, no failure notice: the peer never learned of it
    assert!(h.network.tx_messages().is_empty());
}

#[tokio::test]
async fn connection_error_fails_the_bound_transfer() {
    let mut h = harness();
    h.keychain.add_coin(unspent_coin(100));
    synchronize(&mut h, 1).await;

    h.wallet.transfer_money(PeerId(4), 100).await.unwrap();
    let (_, invite) = sent_invite(&h.network);

    h.wallet.on_connection_error(PeerId(4)).await.unwrap();

    assert_eq!(h.completed.lock().as_slice(), &[invite.tx_id]);
    assert_eq!(h.wallet.active_transfers(), 0);
}

// Two wallets wired back-to-back; every peer and node message relayed
// by hand. Covers the receiver side of the protocol end to end.
#[tokio::test]
async fn two_party_transfer_end_to_end() {
    let mut alice = harness();
    let mut bob = harness();
    let alice_peer = PeerId(100); // how bob addresses alice
    let bob_peer = PeerId(200); // how alice addresses bob

    alice.keychain.add_coin(unspent_coin(120));
    synchronize(&mut alice, 1).await;
    synchronize(&mut bob, 1).await;

    alice.wallet.transfer_money(bob_peer, 70).await.unwrap();
    let (_, invite) = sent_invite(&alice.network);
    let tx_id = invite.tx_id;

    // invite travels to bob
    bob.wallet
        .on_tx_message(alice_peer, PeerMessage::InviteReceiver(invite))
        .await
        .unwrap();
    let ack = bob
        .network
        .tx_messages()
        .into_iter()
        .find_map(|(_, m)| match m {
            PeerMessage::ConfirmInvitation(data) => Some(data),
            _ => None,
        })
        .expect("bob did not accept");
    // bob recorded his incoming coin
    let bob_coins = bob.keychain.coins();
    assert_eq!(bob_coins.len(), 1);
    assert_eq!(bob_coins[0].amount, 70);
    assert_eq!(bob_coins[0].status, CoinStatus::Unconfirmed);
    assert_eq!(bob_coins[0].create_tx_id, Some(tx_id));

    // acceptance travels back to alice: she confirms and registers
    alice
        .wallet
        .on_tx_message(bob_peer, PeerMessage::ConfirmInvitation(ack))
        .await
        .unwrap();
    let confirmation = alice
        .network
        .tx_messages()
        .into_iter()
        .find_map(|(_, m)| match m {
            PeerMessage::ConfirmTransaction(data) => Some(data),
            _ => None,
        })
        .expect("alice did not confirm");
    assert_eq!(alice.wallet.pending_registrations(), 1);

    // confirmation travels to bob
    bob.wallet
        .on_tx_message(alice_peer, PeerMessage::ConfirmTransaction(confirmation))
        .await
        .unwrap();

    // the node accepts alice's registration
    alice
        .wallet
        .on_node_message(NodeEvent::RegistrationResult { value: true })
        .await
        .unwrap();
    assert_eq!(alice.completed.lock().as_slice(), &[tx_id]);
    let registered = alice
        .network
        .tx_messages()
        .into_iter()
        .find_map(|(_, m)| match m {
            PeerMessage::TxRegistered(data) => Some(data),
            _ => None,
        })
        .expect("alice did not relay the registration");

    // the relay reaches bob's receiver
    bob.wallet
        .on_tx_message(alice_peer, PeerMessage::TxRegistered(registered))
        .await
        .unwrap();
    assert_eq!(bob.completed.lock().as_slice(), &[tx_id]);
    assert_eq!(bob.wallet.active_transfers(), 0);
    assert_eq!(alice.wallet.active_transfers(), 0);

    // alice's inputs are locked pending the next sync round
    assert!(alice
        .keychain
        .coins()
        .iter()
        .any(|c| c.status == CoinStatus::Locked && c.spent_tx_id == Some(tx_id)));
    // and her change coin exists, unconfirmed
    assert!(alice
        .keychain
        .coins()
        .iter()
        .any(|c| c.status == CoinStatus::Unconfirmed && c.amount == 50));
}

// Round-trip law: a parked transfer, once released, produces the same
// external behavior as one started on a synchronized wallet.
#[tokio::test]
async fn parked_and_synchronous_transfers_behave_identically() {
    // synchronized first
    let mut sync_h = harness();
    sync_h.keychain.add_coin(unspent_coin(80));
    synchronize(&mut sync_h, 1).await;
    sync_h.wallet.transfer_money(PeerId(1), 80).await.unwrap();
    let (_, sync_invite) = sent_invite(&sync_h.network);

    // parked first
    let mut parked_h = harness();
    parked_h.keychain.add_coin(unspent_coin(80));
    parked_h.wallet.transfer_money(PeerId(1), 80).await.unwrap();
    synchronize(&mut parked_h, 1).await;
    let (_, parked_invite) = sent_invite(&parked_h.network);

    assert_eq!(sync_invite.amount, parked_invite.amount);
    assert_eq!(sync_invite.fee, parked_invite.fee);
    assert_eq!(sync_invite.inputs.len(), parked_invite.inputs.len());
    assert_eq!(sync_invite.change.len(), parked_invite.change.len());
}
