#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                /// Fetches a record; a missing record is reported as `NotFound`.
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: $crate::domain::ProductId) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .get(id)
                        .await
                        .map_err(|e| <$error>::ActorCommunicationError(e.to_string()))?
                        .ok_or(<$error>::NotFound(id))
                }

                /// Inserts or replaces a record, returning the previous one.
                #[tracing::instrument(skip(self, item))]
                pub async fn [<put_ $entity_name_snake>](&self, item: $entity) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.put(item).await.map_err(|e| <$error>::ActorCommunicationError(e.to_string()))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: $crate::domain::ProductId) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id).await.map_err(|e| match e {
                        $crate::actor_framework::FrameworkError::NotFound(_) => <$error>::NotFound(id),
                        other => <$error>::ActorCommunicationError(other.to_string()),
                    })
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        $crate::impl_client_new!($client_name, $entity);
        $crate::impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}
