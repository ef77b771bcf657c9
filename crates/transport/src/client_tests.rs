#[cfg(test)]
mod tests {
    use crate::{HttpTransport, PersonTransport, TransportConfig, TransportError};
    use rolodex_core::{ContactFields, ContactType, Person, PersonId};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server() -> (MockServer, HttpTransport) {
        let server = MockServer::start().await;
        let transport =
            HttpTransport::new(&TransportConfig::default().with_base_url(server.uri())).unwrap();
        (server, transport)
    }

    #[tokio::test]
    async fn test_list_parses_collection() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/api/persons/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "Ann", "email": "a@x.com", "phone_number": "1", "contact_type": "P"},
                {"id": 2, "name": "Bo", "email": "b@x.com", "phone_number": "", "contact_type": ""}
            ])))
            .mount(&server)
            .await;

        let persons = transport.list().await.unwrap();
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[0].id, PersonId(1));
        assert_eq!(persons[0].fields.contact_type, Some(ContactType::Personal));
        assert_eq!(persons[1].fields.contact_type, None);
    }

    #[tokio::test]
    async fn test_create_posts_draft_without_id() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("POST"))
            .and(path("/api/persons/"))
            .and(body_json(serde_json::json!({
                "name": "Cy", "email": "c@x.com", "phone_number": "", "contact_type": "W"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 7, "name": "Cy", "email": "c@x.com", "phone_number": "", "contact_type": "W"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ContactFields::new("Cy", "c@x.com").with_contact_type(ContactType::Work);
        let created = transport.create(&draft).await.unwrap();
        assert_eq!(created.id, PersonId(7));
        assert_eq!(created.fields, draft);
    }

    #[tokio::test]
    async fn test_replace_returns_echoed_body() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("PUT"))
            .and(path("/api/persons/3/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 3, "name": "Ann", "email": "new@x.com", "phone_number": "", "contact_type": ""
            })))
            .mount(&server)
            .await;

        let person = Person::new(PersonId(3), ContactFields::new("Ann ", "new@x.com"));
        let echoed = transport.replace(&person).await.unwrap().unwrap();
        assert_eq!(echoed.name(), "Ann");
        assert_eq!(echoed.email(), "new@x.com");
    }

    #[tokio::test]
    async fn test_replace_without_body_returns_none() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("PUT"))
            .and(path("/api/persons/3/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let person = Person::new(PersonId(3), ContactFields::new("Ann", "a@x.com"));
        assert!(transport.replace(&person).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_hits_item_url() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("DELETE"))
            .and(path("/api/persons/5/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        transport.delete(PersonId(5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("DELETE"))
            .and(path("/api/persons/9/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found."))
            .mount(&server)
            .await;

        let err = transport.delete(PersonId(9)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/api/persons/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let err = transport.list().await.unwrap_err();
        match &err {
            TransportError::HttpStatus { code, body } => {
                assert_eq!(*code, 503);
                assert_eq!(body, "maintenance");
            },
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_parse_error() {
        let (server, transport) = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/api/persons/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = transport.list().await.unwrap_err();
        match err {
            TransportError::JsonParse { context, .. } => {
                assert!(context.contains("person list"));
                assert!(context.contains("<html>oops</html>"));
            },
            other => panic!("expected JsonParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let transport = HttpTransport::new(
            &TransportConfig::default().with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let err = transport.list().await.unwrap_err();
        assert!(matches!(err, TransportError::HttpRequest(_)));
    }
}
