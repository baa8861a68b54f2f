pub(crate) mod pcm;
