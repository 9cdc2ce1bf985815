//! Integration tests per gli endpoints degli inviti di connessione

mod common;

#[cfg(test)]
mod invitation_tests {
    use super::common::{TestEnv, bearer};
    use axum_test::http::HeaderName;
    use connections::platform::memory::NotificationRecord;
    use serde_json::json;

    /// Due gruppi con un admin ciascuno: alice (1) amministra Alpha (10),
    /// bob (2) amministra Beta (20).
    fn two_groups() -> TestEnv {
        let env = TestEnv::new();
        env.directory.add_group(10, "Alpha", &[1]);
        env.directory.add_group(20, "Beta", &[2]);
        env
    }

    // ============================================================
    // Test per POST /groups/{group_id}/invitations - send_invitation
    // ============================================================

    #[tokio::test]
    async fn test_send_invitation_success() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_ok();
        let invitation: serde_json::Value = response.json();
        assert_eq!(invitation["inviter_group_id"], 10);
        assert_eq!(invitation["invitee_group_id"], 20);
        assert_eq!(invitation["status"], "Pending");
        assert!(invitation["connection_id"].is_null());

        // Gli admin del gruppo invitato ricevono la notifica
        let records = env.notifier.records();
        assert_eq!(records.len(), 1);
        assert!(matches!(
            &records[0],
            NotificationRecord::InvitationSent { recipients, .. } if recipients == &vec![2]
        ));
    }

    #[tokio::test]
    async fn test_send_invitation_without_token() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_send_invitation_with_invalid_token() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(
                HeaderName::from_static("authorization"),
                "Bearer invalid_token_here",
            )
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_send_invitation_requires_group_admin() {
        let env = two_groups();
        let server = env.server();

        // bob non amministra Alpha
        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_platform_moderator_can_send_invitation() {
        let env = two_groups();
        env.directory.add_moderator(99);
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(99, "mod"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_group_cannot_invite_itself() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 10 }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_duplicate_pending_invitation_conflicts() {
        let env = two_groups();
        let server = env.server();

        let first = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;
        first.assert_status_ok();

        let second = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;
        second.assert_status_conflict();
    }

    #[tokio::test]
    async fn test_reverse_direction_invitation_is_allowed() {
        let env = two_groups();
        let server = env.server();

        let forward = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;
        forward.assert_status_ok();

        // L'univocità pending è per coppia ordinata
        let reverse = server
            .post("/groups/20/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .json(&json!({ "invitee_group_id": 10 }))
            .await;
        reverse.assert_status_ok();
    }

    #[tokio::test]
    async fn test_send_invitation_with_connections_disabled() {
        let env = two_groups();
        env.directory.disable_connections(20);
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_send_invitation_rejects_invalid_group_id() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 0 }))
            .await;

        response.assert_status_bad_request();
    }

    // ============================================================
    // Test per POST /invitations/{id}/{action} - respond_to_invitation
    // ============================================================

    async fn send_invitation(server: &axum_test::TestServer) -> i64 {
        let response = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;
        response.assert_status_ok();
        let invitation: serde_json::Value = response.json();
        invitation["invitation_id"].as_i64().expect("invitation_id")
    }

    #[tokio::test]
    async fn test_accept_invitation_creates_connection() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let response = server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;

        response.assert_status_ok();
        let invitation: serde_json::Value = response.json();
        assert_eq!(invitation["status"], "Accepted");
        assert!(invitation["connection_id"].is_number());
        assert!(invitation["date_accepted"].is_string());

        // La connessione è visibile da entrambi i lati
        for (group_id, counterpart) in [(10, 20), (20, 10)] {
            let list = server
                .get(&format!("/groups/{}/connections", group_id))
                .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
                .await;
            list.assert_status_ok();
            let connections: Vec<serde_json::Value> = list.json();
            assert_eq!(connections.len(), 1);
            assert_eq!(connections[0]["connected_group"]["group_id"], counterpart);
        }

        // Invio + accettazione notificati
        let records = env.notifier.records();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            &records[1],
            NotificationRecord::InvitationAccepted { recipient, .. } if *recipient == 1
        ));
    }

    #[tokio::test]
    async fn test_accept_requires_invitee_admin() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        // alice amministra il gruppo inviter, non l'invitato
        let response = server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_accept_twice_conflicts() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await
            .assert_status_ok();

        let again = server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        again.assert_status_conflict();
    }

    #[tokio::test]
    async fn test_reject_then_reinvite_succeeds() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let rejected = server
            .post(&format!("/invitations/{}/reject", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        rejected.assert_status_ok();
        let invitation: serde_json::Value = rejected.json();
        assert_eq!(invitation["status"], "Rejected");
        assert!(invitation["connection_id"].is_null());

        // Nessuna connessione creata dal rifiuto
        let list = server
            .get("/groups/10/connections")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        let connections: Vec<serde_json::Value> = list.json();
        assert!(connections.is_empty());

        // Un invito risolto non blocca un nuovo tentativo
        let retry = server
            .post("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .json(&json!({ "invitee_group_id": 20 }))
            .await;
        retry.assert_status_ok();
    }

    #[tokio::test]
    async fn test_invalid_action_is_rejected() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let response = server
            .post(&format!("/invitations/{}/maybe", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_respond_to_missing_invitation() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .post("/invitations/9999/accept")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_cross_accept_leaves_second_invitation_pending() {
        let env = two_groups();
        let server = env.server();

        // Inviti pendenti in entrambe le direzioni
        let forward_id = send_invitation(&server).await;
        let reverse = server
            .post("/groups/20/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .json(&json!({ "invitee_group_id": 10 }))
            .await;
        reverse.assert_status_ok();
        let reverse_body: serde_json::Value = reverse.json();
        let reverse_id = reverse_body["invitation_id"].as_i64().unwrap();

        server
            .post(&format!("/invitations/{}/accept", forward_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await
            .assert_status_ok();

        // La coppia è già connessa: accettare l'invito inverso fallisce
        // e l'invito resta pending
        let second = server
            .post(&format!("/invitations/{}/accept", reverse_id))
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        second.assert_status_conflict();

        let pending = server
            .get("/groups/10/invitations?direction=received")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        pending.assert_status_ok();
        let invitations: Vec<serde_json::Value> = pending.json();
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0]["invitation_id"], reverse_id);
        assert_eq!(invitations[0]["status"], "Pending");
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_roll_back_accept() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        env.notifier.fail_all();

        let response = server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        response.assert_status_ok();

        let list = server
            .get("/groups/20/connections")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        let connections: Vec<serde_json::Value> = list.json();
        assert_eq!(connections.len(), 1);
    }

    // ============================================================
    // Test per DELETE /invitations/{id} - delete_invitation
    // ============================================================

    #[tokio::test]
    async fn test_delete_pending_invitation() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let response = server
            .delete(&format!("/invitations/{}", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        response.assert_status_ok();

        let accept = server
            .post(&format!("/invitations/{}/accept", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        accept.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_delete_requires_inviter_admin() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let response = server
            .delete(&format!("/invitations/{}", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_delete_resolved_invitation_conflicts() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        server
            .post(&format!("/invitations/{}/reject", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await
            .assert_status_ok();

        // Gli inviti risolti sono storia immutabile
        let response = server
            .delete(&format!("/invitations/{}", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        response.assert_status_conflict();
    }

    // ============================================================
    // Test per GET /groups/{group_id}/invitations - list_invitations
    // ============================================================

    #[tokio::test]
    async fn test_list_invitations_directions() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        let received = server
            .get("/groups/20/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        received.assert_status_ok();
        let invitations: Vec<serde_json::Value> = received.json();
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0]["invitation_id"], invitation_id);
        assert_eq!(invitations[0]["inviter_group"]["name"], "Alpha");
        assert_eq!(invitations[0]["invitee_group"]["slug"], "beta");

        let sent = server
            .get("/groups/10/invitations?direction=sent")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        sent.assert_status_ok();
        let invitations: Vec<serde_json::Value> = sent.json();
        assert_eq!(invitations.len(), 1);

        // Alpha non ha ricevuto nulla
        let received_by_inviter = server
            .get("/groups/10/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;
        let invitations: Vec<serde_json::Value> = received_by_inviter.json();
        assert!(invitations.is_empty());
    }

    #[tokio::test]
    async fn test_list_invitations_pending_filter() {
        let env = two_groups();
        let server = env.server();
        let invitation_id = send_invitation(&server).await;

        server
            .post(&format!("/invitations/{}/reject", invitation_id))
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await
            .assert_status_ok();

        // Default: solo pending
        let pending = server
            .get("/groups/20/invitations")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        let invitations: Vec<serde_json::Value> = pending.json();
        assert!(invitations.is_empty());

        // pending=false include la storia risolta
        let all = server
            .get("/groups/20/invitations?pending=false")
            .add_header(HeaderName::from_static("authorization"), bearer(2, "bob"))
            .await;
        let invitations: Vec<serde_json::Value> = all.json();
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0]["status"], "Rejected");
    }

    #[tokio::test]
    async fn test_list_invitations_invalid_direction() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .get("/groups/10/invitations?direction=sideways")
            .add_header(HeaderName::from_static("authorization"), bearer(1, "alice"))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_list_invitations_requires_admin() {
        let env = two_groups();
        let server = env.server();

        let response = server
            .get("/groups/10/invitations")
            .add_header(
                HeaderName::from_static("authorization"),
                bearer(42, "stranger"),
            )
            .await;

        response.assert_status_forbidden();
    }
}
