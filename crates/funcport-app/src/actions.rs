//! Background task execution for update actions.
//!
//! Actions spawn tokio tasks that run the loaders and report completions
//! back over the message channel. Nothing is cancelled: a superseding load's
//! results simply land later and overwrite state.

use tokio::sync::mpsc;

use funcport_core::prelude::*;
use funcport_api::{HostApi, InsightsApi, ManagementApi, ResourceIds};

use crate::loader::{
    load_binding_metadata, load_editor, load_insights_token, load_invocation_details,
    load_invocation_traces, refresh_editor,
};
use crate::message::{Message, UpdateAction};
use crate::test_panel::ResponseContent;

/// Everything a background task needs: the client, the target resource, and
/// the channel completions flow back on.
#[derive(Debug, Clone)]
pub struct TaskContext<C> {
    pub client: C,
    pub ids: ResourceIds,
    pub msg_tx: mpsc::Sender<Message>,
}

impl<C> TaskContext<C>
where
    C: ManagementApi + HostApi + InsightsApi + Clone + Send + Sync + 'static,
{
    pub fn new(client: C, ids: ResourceIds, msg_tx: mpsc::Sender<Message>) -> Self {
        Self {
            client,
            ids,
            msg_tx,
        }
    }

    /// Execute one action on a background task.
    pub fn dispatch(&self, action: UpdateAction) {
        let client = self.client.clone();
        let ids = self.ids.clone();
        let tx = self.msg_tx.clone();

        match action {
            UpdateAction::LoadEditor => {
                tokio::spawn(async move {
                    let snapshot = load_editor(&client, &ids).await;
                    let _ = tx.send(Message::EditorLoaded(Box::new(snapshot))).await;
                });
            }

            UpdateAction::Refresh => {
                tokio::spawn(async move {
                    let snapshot = refresh_editor(&client, &ids).await;
                    let _ = tx.send(Message::EditorLoaded(Box::new(snapshot))).await;
                });
            }

            UpdateAction::FetchInsightsToken { component_id } => {
                tokio::spawn(async move {
                    let token = load_insights_token(&client, &component_id).await;
                    let _ = tx.send(Message::InsightsTokenLoaded { token }).await;
                });
            }

            UpdateAction::FetchFileContent {
                file,
                runtime_version,
            } => {
                tokio::spawn(async move {
                    let envelope = client
                        .fetch_file(&ids.site_id, &ids.function_name, &runtime_version, &file.name)
                        .await;
                    let content = envelope.into_logged(LogCategory::FunctionEdit, "fetch_file");
                    let _ = tx.send(Message::FileContentLoaded { file, content }).await;
                });
            }

            UpdateAction::SaveFile {
                file,
                content,
                runtime_version,
            } => {
                tokio::spawn(async move {
                    let envelope = client
                        .save_file(
                            &ids.site_id,
                            &ids.function_name,
                            &runtime_version,
                            &file.name,
                            &content,
                            &file.mime,
                        )
                        .await;
                    let success = envelope.is_success();
                    if !success {
                        error!(
                            category = LogCategory::FunctionEdit.as_str(),
                            "save_file failed (status {}): {}",
                            envelope.status,
                            envelope.error().unwrap_or_default()
                        );
                    }
                    let _ = tx
                        .send(Message::FileSaved {
                            file_name: file.name,
                            success,
                        })
                        .await;
                });
            }

            UpdateAction::RunFunction {
                info,
                url,
                method,
                headers,
                body,
            } => {
                tokio::spawn(async move {
                    let update = client.update_function(&ids.function_id, &info).await;
                    let message = match update
                        .into_logged(LogCategory::FunctionEdit, "update_function")
                    {
                        Some(updated) => {
                            let response =
                                client.run_function(&url, method, &headers, &body).await;
                            let response_content = if response.status == 0 {
                                error!(
                                    category = LogCategory::FunctionEdit.as_str(),
                                    "run_function transport failure: {}",
                                    response.error().unwrap_or_default()
                                );
                                None
                            } else {
                                let text = match response.result {
                                    Ok(text) => text,
                                    Err(error) => error,
                                };
                                Some(ResponseContent {
                                    code: response.status,
                                    text,
                                })
                            };
                            Message::RunCompleted {
                                function_info: Some(Box::new(updated)),
                                response: response_content,
                            }
                        }
                        None => Message::RunCompleted {
                            function_info: None,
                            response: None,
                        },
                    };
                    let _ = tx.send(message).await;
                });
            }

            UpdateAction::UpdateFunction { info } => {
                tokio::spawn(async move {
                    let envelope = client.update_function(&ids.function_id, &info).await;
                    let function_info = envelope
                        .into_logged(LogCategory::FunctionIntegrate, "update_function")
                        .map(Box::new);
                    let _ = tx.send(Message::FunctionUpdated { function_info }).await;
                });
            }

            UpdateAction::LoadBindingMetadata => {
                tokio::spawn(async move {
                    let metadata = load_binding_metadata(&client, &ids).await;
                    let _ = tx.send(Message::BindingMetadataLoaded { metadata }).await;
                });
            }

            UpdateAction::LoadInvocations { app_id, token } => {
                tokio::spawn(async move {
                    let traces =
                        load_invocation_traces(&client, &app_id, &token, &ids.function_name)
                            .await;
                    let _ = tx.send(Message::InvocationsLoaded { traces }).await;
                });
            }

            UpdateAction::LoadInvocationDetails {
                app_id,
                token,
                operation_id,
                invocation_id,
            } => {
                tokio::spawn(async move {
                    let details = load_invocation_details(
                        &client,
                        &app_id,
                        &token,
                        &operation_id,
                        &invocation_id,
                    )
                    .await;
                    let _ = tx.send(Message::InvocationDetailsLoaded { details }).await;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FAKE_SITE_ID};
    use funcport_api::models::ArmObj;
    use funcport_core::HttpMethod;
    use std::collections::BTreeMap;

    fn context(api: FakeApi) -> (TaskContext<FakeApi>, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(16);
        let ids = ResourceIds::new(FAKE_SITE_ID, "httpping");
        (TaskContext::new(api, ids, tx), rx)
    }

    #[tokio::test]
    async fn test_load_editor_action_reports_snapshot() {
        let (ctx, mut rx) = context(FakeApi::healthy());
        ctx.dispatch(UpdateAction::LoadEditor);

        let Some(Message::EditorLoaded(snapshot)) = rx.recv().await else {
            panic!("expected a snapshot message");
        };
        assert!(snapshot.site.is_some());
        assert!(snapshot.file_list.is_some());
    }

    #[tokio::test]
    async fn test_run_persists_before_invoking() {
        let api = FakeApi::healthy();
        let (ctx, mut rx) = context(api.clone());

        let info = ArmObj::new("/f", "httpping", api.function.clone());
        ctx.dispatch(UpdateAction::RunFunction {
            info: Box::new(info),
            url: "https://app1.example.net/api/httpping".to_string(),
            method: HttpMethod::Post,
            headers: BTreeMap::new(),
            body: "{}".to_string(),
        });

        let Some(Message::RunCompleted {
            function_info,
            response,
        }) = rx.recv().await
        else {
            panic!("expected run completion");
        };
        assert!(function_info.is_some());
        assert_eq!(response.unwrap().text, "pong");
        assert_eq!(api.calls(), vec!["update_function", "run_function"]);
    }

    #[tokio::test]
    async fn test_failed_update_skips_invocation() {
        let api = FakeApi::healthy().failing_update();
        let (ctx, mut rx) = context(api.clone());

        let info = ArmObj::new("/f", "httpping", api.function.clone());
        ctx.dispatch(UpdateAction::RunFunction {
            info: Box::new(info),
            url: "https://app1.example.net/api/httpping".to_string(),
            method: HttpMethod::Post,
            headers: BTreeMap::new(),
            body: String::new(),
        });

        let Some(Message::RunCompleted {
            function_info,
            response,
        }) = rx.recv().await
        else {
            panic!("expected run completion");
        };
        assert!(function_info.is_none());
        assert!(response.is_none());
        assert_eq!(api.calls(), vec!["update_function"]);
    }

    #[tokio::test]
    async fn test_failed_run_reports_error_body() {
        let mut api = FakeApi::healthy();
        api.run_status = 500;
        api.run_body = "boom".to_string();
        let (ctx, mut rx) = context(api.clone());

        let info = ArmObj::new("/f", "httpping", api.function.clone());
        ctx.dispatch(UpdateAction::RunFunction {
            info: Box::new(info),
            url: "https://app1.example.net/api/httpping".to_string(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: String::new(),
        });

        let Some(Message::RunCompleted { response, .. }) = rx.recv().await else {
            panic!("expected run completion");
        };
        let response = response.unwrap();
        assert_eq!(response.code, 500);
        assert_eq!(response.text, "boom");
    }

    #[tokio::test]
    async fn test_update_function_reports_written_copy() {
        let api = FakeApi::healthy();
        let (ctx, mut rx) = context(api.clone());

        let mut info = ArmObj::new("/f", "httpping", api.function.clone());
        info.properties.config.bindings.clear();
        ctx.dispatch(UpdateAction::UpdateFunction {
            info: Box::new(info),
        });

        let Some(Message::FunctionUpdated { function_info }) = rx.recv().await else {
            panic!("expected update completion");
        };
        assert!(function_info.unwrap().properties.config.bindings.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_update_reports_none() {
        let api = FakeApi::healthy().failing_update();
        let (ctx, mut rx) = context(api.clone());

        let info = ArmObj::new("/f", "httpping", api.function.clone());
        ctx.dispatch(UpdateAction::UpdateFunction {
            info: Box::new(info),
        });

        let Some(Message::FunctionUpdated { function_info }) = rx.recv().await else {
            panic!("expected update completion");
        };
        assert!(function_info.is_none());
    }

    #[tokio::test]
    async fn test_fetch_file_failure_reports_none() {
        let api = FakeApi::healthy().failing_file_content();
        let (ctx, mut rx) = context(api);

        let file = funcport_api::models::VfsObject {
            name: "run.csx".to_string(),
            mime: "text/plain".to_string(),
            ..Default::default()
        };
        ctx.dispatch(UpdateAction::FetchFileContent {
            file,
            runtime_version: "~2".to_string(),
        });

        let Some(Message::FileContentLoaded { content, .. }) = rx.recv().await else {
            panic!("expected content message");
        };
        assert!(content.is_none());
    }
}
