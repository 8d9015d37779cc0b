mod foundation_pipeline;
mod foundation_sync;
