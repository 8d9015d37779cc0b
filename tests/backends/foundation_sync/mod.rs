mod timed_semaphore;
